use gather_db::models::InterestRow;
use gather_db::queries::{groups, interests};
use gather_db::{Connection, Result};

/// Interests relevant to a group: the union of its members' interests.
///
/// Each interest appears once however many members share it. A group with no
/// members (or an unknown group) has no interests.
pub fn interests_for_group(conn: &Connection, group_id: &str) -> Result<Vec<InterestRow>> {
    let member_ids = groups::member_ids(conn, group_id)?;
    if member_ids.is_empty() {
        return Ok(vec![]);
    }

    let interest_ids = interests::interest_ids_for_users(conn, &member_ids)?;
    interests::interests_by_ids(conn, &interest_ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;

    #[test]
    fn shared_interests_appear_once() {
        let fx = Fixture::new();
        let group = fx.group("climbers");
        let ada = fx.member(&group, "ada");
        let grace = fx.member(&group, "grace");
        let hiking = fx.interest("hiking");
        let chess = fx.interest("chess");
        fx.likes(&ada, &[&hiking, &chess]);
        fx.likes(&grace, &[&hiking]);

        let found = fx.db.with_conn(|conn| interests_for_group(conn, &group)).unwrap();
        let mut ids: Vec<_> = found.iter().map(|i| i.id.clone()).collect();
        ids.sort();
        let mut expected = vec![hiking, chess];
        expected.sort();
        assert_eq!(ids, expected);
    }

    #[test]
    fn empty_group_has_no_interests() {
        let fx = Fixture::new();
        let group = fx.group("quiet");
        let outsider = fx.user("linus");
        let hiking = fx.interest("hiking");
        fx.likes(&outsider, &[&hiking]);

        let found = fx.db.with_conn(|conn| interests_for_group(conn, &group)).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn non_member_interests_are_excluded() {
        let fx = Fixture::new();
        let group = fx.group("climbers");
        let ada = fx.member(&group, "ada");
        let outsider = fx.user("linus");
        let hiking = fx.interest("hiking");
        let chess = fx.interest("chess");
        fx.likes(&ada, &[&hiking]);
        fx.likes(&outsider, &[&chess]);

        let found = fx.db.with_conn(|conn| interests_for_group(conn, &group)).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "hiking");
    }
}
