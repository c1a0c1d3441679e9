use std::fs::{self, File, OpenOptions};
use std::io::Seek;
use std::path::{Path, PathBuf};

use lumen_file_data::{scan, FileId, FileRef, PathResolver, ScanReport};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// A project exists always within a given directory and this file
/// will be created directly in that directory.
const PROJECT_INDEX_FILENAME: &str = "file_refs.index";

/// Extension of a file reference document.
const FILE_REF_EXT: &str = "filedata";

#[derive(Serialize, Deserialize, Default)]
struct FileRefDb {
    documents: Vec<PathBuf>,
}

impl FileRefDb {
    // sort contents so serialization is deterministic
    fn pre_serialize(&mut self) {
        self.documents.sort();
    }
}

struct Entry {
    /// Document path relative to the project directory.
    document: PathBuf,
    record: FileRef,
}

/// Error returned by the project.
#[derive(Error, Debug)]
pub enum Error {
    /// Parsing of an index or record document failed.
    #[error("parsing '{0}' failed with {1}")]
    Parse(PathBuf, #[source] serde_json::Error),
    /// Not found.
    #[error("not found")]
    NotFound,
    /// IO error on an index or record document.
    #[error("IO on '{0}' failed with {1}")]
    Io(PathBuf, #[source] std::io::Error),
    /// Another record already writes to the same document.
    #[error("name '{0}' already used by another file reference")]
    NameAlreadyUsed(String),
    /// A record with this id already exists.
    #[error("file '{0}' is already tracked")]
    IdAlreadyTracked(FileId),
    /// The chosen save location does not lie under the project
    /// directory.
    #[error("save location '{0}' is outside the project directory")]
    DocumentOutsideProject(PathBuf),
    /// The referenced file lies outside the root directory.
    #[error(transparent)]
    FileRef(#[from] lumen_file_data::Error),
}

/// A file-backed store of file reference records.
///
/// The project lives in a directory and keeps two kinds of files
/// there: one JSON document per record, at a location chosen when the
/// record is created, and an index listing every document.
///
/// # Project Index
///
/// The index is read once when the [`Project`] is opened and kept in
/// memory throughout its lifetime; every mutation is flushed back
/// immediately, so a crash between mutations loses nothing.
///
/// ## Example directory structure
///
/// A project tracking 2 streamed files looks as follows:
/// ```markdown
///  ./
///  | + streaming/
///  | |- video/intro.mp4
///  | |- video/intro.filedata
///  | |- audio/bank0.dat
///  | |- audio/bank0.filedata
///  |- file_refs.index
/// ```
///
/// The streamed-files root directory itself is not part of the project
/// state. It is owned by the environment and passed to every call that
/// needs it, so relocating the whole root does not invalidate records.
pub struct Project {
    file: File,
    entries: Vec<Entry>,
    project_dir: PathBuf,
}

impl Project {
    /// Returns the default location of the index file in a given
    /// directory.
    ///
    /// This method replaces the filename in `project_dir` (if one
    /// exists) with the file name of the project index.
    pub fn root_to_index_path(project_dir: impl AsRef<Path>) -> PathBuf {
        let mut path = project_dir.as_ref().to_owned();
        if path.is_dir() {
            path.push(PROJECT_INDEX_FILENAME);
        } else {
            path.set_file_name(PROJECT_INDEX_FILENAME);
        }
        path
    }

    /// Returns the path to project's index file.
    pub fn indexfile_path(&self) -> PathBuf {
        Self::root_to_index_path(&self.project_dir)
    }

    /// Returns the directory the project is in.
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Creates a new project index file turning the containing
    /// directory into a project.
    pub fn create_new(project_dir: impl AsRef<Path>) -> Result<Self, Error> {
        let index_path = Self::root_to_index_path(project_dir.as_ref());
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(&index_path)
            .map_err(|e| Error::Io(index_path.clone(), e))?;

        let db = FileRefDb::default();
        serde_json::to_writer_pretty(&file, &db)
            .map_err(|e| Error::Parse(index_path.clone(), e))?;

        let project_dir = index_path.parent().unwrap_or(Path::new("")).to_owned();
        Ok(Self {
            file,
            entries: Vec::new(),
            project_dir,
        })
    }

    /// Opens the project in the specified directory.
    pub fn open(project_dir: impl AsRef<Path>) -> Result<Self, Error> {
        let index_path = Self::root_to_index_path(project_dir.as_ref());
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&index_path)
            .map_err(|_e| Error::NotFound)?;

        let db: FileRefDb =
            serde_json::from_reader(&file).map_err(|e| Error::Parse(index_path.clone(), e))?;

        let project_dir = index_path.parent().unwrap_or(Path::new("")).to_owned();
        let mut entries = Vec::with_capacity(db.documents.len());
        for document in db.documents {
            let path = project_dir.join(&document);
            let doc_file = File::open(&path).map_err(|e| Error::Io(path.clone(), e))?;
            let record: FileRef =
                serde_json::from_reader(doc_file).map_err(|e| Error::Parse(path, e))?;
            entries.push(Entry { document, record });
        }

        Ok(Self {
            file,
            entries,
            project_dir,
        })
    }

    /// Deletes the project, removing the index file and every record
    /// document.
    pub fn delete(self) {
        for entry in &self.entries {
            let _res = fs::remove_file(self.project_dir.join(&entry.document));
        }
        let index_path = self.indexfile_path();
        let _res = fs::remove_file(index_path);
    }

    /// Returns an iterator over the stored records.
    pub fn file_refs(&self) -> impl Iterator<Item = &FileRef> {
        self.entries.iter().map(|entry| &entry.record)
    }

    /// Returns the record tracking the file with the given id.
    pub fn get(&self, id: FileId) -> Option<&FileRef> {
        self.file_refs().find(|record| record.id() == id)
    }

    /// Checks if a file with the given id is tracked by the project.
    pub fn contains(&self, id: FileId) -> bool {
        self.get(id).is_some()
    }

    /// Finds a record by its display name.
    pub fn find_by_name(&self, display_name: &str) -> Option<&FileRef> {
        self.file_refs()
            .find(|record| record.display_name() == display_name)
    }

    /// Creates and persists a record for the file at `file_path`.
    ///
    /// The record document is written to `save_dir` when one is given,
    /// otherwise next to the referenced file. Either way the chosen
    /// directory must lie under the project directory, since the index
    /// stores document paths relative to it.
    ///
    /// # Errors
    ///
    /// Fails when `file_path` is outside `root`, when the id is
    /// already tracked, when the display name collides with an
    /// existing document, or when the document cannot be written.
    pub fn create_file_ref(
        &mut self,
        display_name: impl Into<String>,
        file_path: impl AsRef<Path>,
        id: FileId,
        save_dir: Option<&Path>,
        root: impl AsRef<Path>,
    ) -> Result<FileId, Error> {
        let display_name = display_name.into();
        let file_path = file_path.as_ref();

        if self.contains(id) {
            return Err(Error::IdAlreadyTracked(id));
        }
        let record = FileRef::new(display_name.clone(), file_path, id, root)?;

        let save_dir = match save_dir {
            Some(dir) => dir.to_owned(),
            None => file_path
                .parent()
                .map_or_else(|| self.project_dir.clone(), Path::to_owned),
        };
        let document_path = save_dir.join(format!("{display_name}.{FILE_REF_EXT}"));
        let document = document_path
            .strip_prefix(&self.project_dir)
            .map_err(|_e| Error::DocumentOutsideProject(document_path.clone()))?
            .to_owned();
        if self.entries.iter().any(|entry| entry.document == document) {
            return Err(Error::NameAlreadyUsed(display_name));
        }

        fs::create_dir_all(&save_dir).map_err(|e| Error::Io(save_dir.clone(), e))?;
        if let Err(e) = Self::write_document(&document_path, &record) {
            let _res = fs::remove_file(&document_path);
            return Err(e);
        }

        self.entries.push(Entry { document, record });
        self.flush()?;
        Ok(id)
    }

    /// Removes the record tracking the file with the given id,
    /// deleting its document.
    pub fn delete_file_ref(&mut self, id: FileId) -> Result<(), Error> {
        let position = self
            .entries
            .iter()
            .position(|entry| entry.record.id() == id)
            .ok_or(Error::NotFound)?;
        let entry = self.entries.remove(position);

        let document_path = self.project_dir.join(&entry.document);
        fs::remove_file(&document_path).map_err(|e| Error::Io(document_path, e))?;
        self.flush()
    }

    /// Reconciles every stored record against the resolver, persisting
    /// the records whose path was rewritten.
    ///
    /// Orphaned and out-of-root records are reported but kept on disk
    /// untouched for manual follow-up. A rewrite is committed to the
    /// in-memory record only after its document was saved, so a failed
    /// save leaves that record stale on both sides and a later pass
    /// reconciles it again.
    pub fn reconcile_all(
        &mut self,
        resolver: &impl PathResolver,
        root: impl AsRef<Path>,
    ) -> Result<ScanReport, Error> {
        let mut working: Vec<FileRef> = self
            .entries
            .iter()
            .map(|entry| entry.record.clone())
            .collect();
        let report = scan(working.iter_mut(), resolver, root);

        for (entry, rewritten) in self.entries.iter_mut().zip(working) {
            if entry.record == rewritten {
                continue;
            }
            let document_path = self.project_dir.join(&entry.document);
            Self::write_document(&document_path, &rewritten)?;
            entry.record = rewritten;
        }

        debug!(
            "reconciled {} file references: {} updated, {} orphaned, {} out of root",
            self.entries.len(),
            report.updated.len(),
            report.orphaned.len(),
            report.out_of_root.len()
        );
        Ok(report)
    }

    fn write_document(document_path: &Path, record: &FileRef) -> Result<(), Error> {
        let doc_file =
            File::create(document_path).map_err(|e| Error::Io(document_path.to_owned(), e))?;
        serde_json::to_writer_pretty(doc_file, record)
            .map_err(|e| Error::Parse(document_path.to_owned(), e))
    }

    fn flush(&mut self) -> Result<(), Error> {
        let mut db = FileRefDb {
            documents: self
                .entries
                .iter()
                .map(|entry| entry.document.clone())
                .collect(),
        };
        db.pre_serialize();

        self.file
            .set_len(0)
            .map_err(|e| Error::Io(self.indexfile_path(), e))?;
        self.file
            .seek(std::io::SeekFrom::Start(0))
            .map_err(|e| Error::Io(self.indexfile_path(), e))?;
        serde_json::to_writer_pretty(&self.file, &db)
            .map_err(|e| Error::Parse(self.indexfile_path(), e))
    }
}
