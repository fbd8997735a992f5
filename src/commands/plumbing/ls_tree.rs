use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::display_entry;
use derive_new::new;

#[derive(Debug, Clone, Default, new)]
pub struct LsTreeOptions {
    pub recursive: bool,
}

impl Repository {
    /// List a tree, or the tree of a commit
    ///
    /// Entries come out in git's tree order. With `recursive`, subtrees are
    /// expanded and only leaves are printed, each under its full path.
    pub fn ls_tree(&self, object_sha: &str, opts: &LsTreeOptions) -> anyhow::Result<()> {
        let oid = ObjectId::try_parse(object_sha.to_string())
            .map_err(|_| anyhow::anyhow!("Not a valid object name {object_sha}"))?;

        let tree_oid = match self.database().parse_object_as_commit(&oid)? {
            Some(commit) => commit.tree_oid().clone(),
            None => oid,
        };
        let tree = self.database().load_tree(&tree_oid)?;

        if opts.recursive {
            for (path, entry) in tree.leaves_in_git_order() {
                writeln!(self.writer(), "{}", display_entry(&path, entry.mode, &entry.oid))?;
            }
        } else {
            for (name, entry) in tree.entries_in_git_order() {
                writeln!(self.writer(), "{}", display_entry(name, entry.mode(), entry.oid()))?;
            }
        }

        Ok(())
    }
}
