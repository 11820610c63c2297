use crate::areas::database::Database;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::{HashSet, VecDeque};

/// Lazy iterator over a commit and its ancestors
///
/// Yields the start commit first. With `follow_all_parents` unset only designated
/// (first) parents are followed, so the walk is a single chain ending at the root.
/// Otherwise every parent is visited breadth-first and each commit is yielded once.
///
/// A commit that fails to load is yielded as an error and ends the walk.
pub struct Ancestors<'d> {
    database: &'d Database,
    follow_all_parents: bool,
    queue: VecDeque<ObjectId>,
    visited: HashSet<ObjectId>,
}

impl<'d> Ancestors<'d> {
    pub fn new(database: &'d Database, start: ObjectId, follow_all_parents: bool) -> Self {
        Ancestors {
            database,
            follow_all_parents,
            queue: VecDeque::from([start]),
            visited: HashSet::new(),
        }
    }

    pub fn first_parent(database: &'d Database, start: ObjectId) -> Self {
        Self::new(database, start, false)
    }

    pub fn all_parents(database: &'d Database, start: ObjectId) -> Self {
        Self::new(database, start, true)
    }
}

impl Iterator for Ancestors<'_> {
    type Item = anyhow::Result<Commit>;

    fn next(&mut self) -> Option<Self::Item> {
        let oid = loop {
            let oid = self.queue.pop_front()?;
            if self.visited.insert(oid.clone()) {
                break oid;
            }
        };

        match self.database.load_commit(&oid) {
            Ok(commit) => {
                if self.follow_all_parents {
                    self.queue.extend(commit.parents().iter().cloned());
                } else {
                    self.queue.extend(commit.parent().cloned());
                }

                Some(Ok(commit))
            }
            Err(err) => {
                self.queue.clear();
                Some(Err(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::commit::FileMap;
    use assert_fs::TempDir;
    use chrono::DateTime;
    use pretty_assertions::assert_eq;

    struct History {
        _dir: TempDir,
        database: Database,
    }

    impl History {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let database = Database::new(dir.path().join("objects").into_boxed_path());

            History {
                _dir: dir,
                database,
            }
        }

        fn commit(&self, message: &str, parents: &[&ObjectId]) -> ObjectId {
            let commit = if parents.is_empty() {
                Commit::root().unwrap()
            } else {
                Commit::with_timestamp(
                    message,
                    DateTime::parse_from_rfc3339("2024-01-01T00:00:00+00:00").unwrap(),
                    parents.iter().map(|oid| (*oid).clone()).collect(),
                    FileMap::new(),
                )
                .unwrap()
            };

            self.database.store(&commit).unwrap()
        }

        fn messages(&self, walk: Ancestors<'_>) -> Vec<String> {
            walk.map(|commit| commit.unwrap().message().to_string())
                .collect()
        }
    }

    //   root - a - b ------ m
    //           \          /
    //            c ------ d
    fn merge_history(history: &History) -> ObjectId {
        let root = history.commit("", &[]);
        let a = history.commit("a", &[&root]);
        let b = history.commit("b", &[&a]);
        let c = history.commit("c", &[&a]);
        let d = history.commit("d", &[&c]);

        history.commit("m", &[&b, &d])
    }

    #[test]
    fn first_parent_walk_skips_second_parents() {
        let history = History::new();
        let merge = merge_history(&history);

        let messages = history.messages(Ancestors::first_parent(&history.database, merge));

        assert_eq!(messages, vec!["m", "b", "a", "initial commit"]);
    }

    #[test]
    fn all_parents_walk_is_breadth_first_without_repeats() {
        let history = History::new();
        let merge = merge_history(&history);

        let messages = history.messages(Ancestors::all_parents(&history.database, merge));

        assert_eq!(messages, vec!["m", "b", "d", "a", "c", "initial commit"]);
    }

    #[test]
    fn walk_from_root_yields_only_root() {
        let history = History::new();
        let root = history.commit("", &[]);

        let messages = history.messages(Ancestors::first_parent(&history.database, root));

        assert_eq!(messages, vec!["initial commit"]);
    }

    #[test]
    fn missing_commit_ends_walk_with_error() {
        let history = History::new();
        let missing = ObjectId::hash(b"missing");

        let mut walk = Ancestors::first_parent(&history.database, missing);

        assert!(walk.next().unwrap().is_err());
        assert!(walk.next().is_none());
    }
}
