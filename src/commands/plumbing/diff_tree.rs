use crate::DiffOutputFormat;
use crate::areas::repository::Repository;
use crate::artifacts::diff::change::{ChangeEntry, ChangeSide, DiffFilter};
use crate::artifacts::diff::report::{DiffReport, FileChange};
use crate::artifacts::history::root_policy::Comparison;
use crate::artifacts::objects::entry_mode::NULL_MODE;
use crate::artifacts::objects::object_id::NULL_OID_RAW;
use crate::errors::DiffError;
use colored::Colorize;
use derive_new::new;

#[derive(Debug, Clone, new)]
pub struct DiffTreeOptions {
    pub format: DiffOutputFormat,
    pub filter: Option<DiffFilter>,
    pub no_commit_id: bool,
    pub summary: bool,
}

impl Repository {
    /// Print the changes `commit` introduced over its first parent
    ///
    /// A root commit prints nothing and is not an error.
    pub fn diff_tree(&self, commit: &str, opts: &DiffTreeOptions) -> anyhow::Result<()> {
        let comparison = match Comparison::resolve(self, commit) {
            Ok(comparison) => comparison,
            Err(error) if Self::is_root_commit(&error) => return Ok(()),
            Err(error) => return Err(error),
        };

        let mut report = comparison.diff()?;
        if let Some(filter) = opts.filter {
            report = report.filtered(filter);
        }

        if report.is_empty() {
            return Ok(());
        }

        if !opts.no_commit_id {
            writeln!(self.writer(), "{}", comparison.commit.commit_oid())?;
        }

        for (file_change, entry) in report.entries() {
            let line = match opts.format {
                DiffOutputFormat::Raw => Self::raw_line(file_change, entry),
                DiffOutputFormat::NameStatus => {
                    format!("{}\t{}", file_change.action.status_char(), file_change.path)
                }
                DiffOutputFormat::NameOnly => file_change.path.clone(),
            };
            writeln!(self.writer(), "{line}")?;
        }

        if opts.summary {
            self.print_summary(&report)?;
        }

        Ok(())
    }

    fn is_root_commit(error: &anyhow::Error) -> bool {
        error
            .downcast_ref::<DiffError>()
            .is_some_and(DiffError::is_root_commit)
    }

    fn raw_line(file_change: &FileChange, entry: &ChangeEntry) -> String {
        let (old_mode, old_oid) = Self::raw_side(entry.from.as_ref());
        let (new_mode, new_oid) = Self::raw_side(entry.to.as_ref());

        format!(
            ":{} {} {} {} {}\t{}",
            old_mode,
            new_mode,
            old_oid,
            new_oid,
            file_change.action.status_char(),
            file_change.path
        )
    }

    fn raw_side(side: Option<&ChangeSide>) -> (String, String) {
        match side {
            Some(side) => (side.mode().as_padded_str(), side.oid().to_string()),
            None => (NULL_MODE.to_string(), NULL_OID_RAW.to_string()),
        }
    }

    fn print_summary(&self, report: &DiffReport) -> anyhow::Result<()> {
        writeln!(self.writer(), "{}", report.summary().to_string().bold())?;

        Ok(())
    }
}
