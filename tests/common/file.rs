use derive_new::new;
use difftree::artifacts::database::database_entry::DatabaseEntry;
use difftree::artifacts::objects::blob::Blob;
use difftree::artifacts::objects::entry_mode::{EntryMode, FileMode};
use difftree::artifacts::objects::object::Object;
use difftree::artifacts::objects::object_id::ObjectId;

/// A file as committed: its path in the tree, its content and its mode
#[derive(Debug, Clone, Eq, PartialEq, new)]
pub struct FileSpec {
    pub path: String,
    pub content: String,
    #[new(value = "FileMode::Regular")]
    pub mode: FileMode,
}

impl FileSpec {
    pub fn executable(mut self) -> Self {
        self.mode = FileMode::Executable;
        self
    }

    pub fn blob(&self) -> Blob {
        Blob::from(self.content.as_str())
    }

    pub fn blob_oid(&self) -> ObjectId {
        self.blob()
            .object_id()
            .unwrap_or_else(|e| panic!("Failed to hash {}: {}", self.path, e))
    }

    pub fn entry(&self) -> DatabaseEntry {
        DatabaseEntry::new(self.blob_oid(), EntryMode::File(self.mode))
    }
}

pub fn files(specs: &[(&str, &str)]) -> Vec<FileSpec> {
    specs
        .iter()
        .map(|(path, content)| FileSpec::new(path.to_string(), content.to_string()))
        .collect()
}

pub fn write_generated_files(prefix: &str, files_count: usize) -> Vec<FileSpec> {
    use fake::{
        Fake,
        faker::lorem::en::{Word, Words},
    };

    (0..files_count)
        .map(|i| {
            let file_name = format!("{}_{i}.txt", Word().fake::<String>());
            let file_content = Words(5..10).fake::<Vec<String>>().join(" ");

            FileSpec::new(format!("{prefix}/{file_name}"), file_content)
        })
        .collect()
}
