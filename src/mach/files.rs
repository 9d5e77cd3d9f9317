use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::rc::Rc;

/// ## Program files
///
/// Used only by `LOAD`, `SAVE` and `FILES`. Closing a file is dropping it.
pub trait FileSystem {
    fn open_read(&mut self, name: &str) -> io::Result<Box<dyn Read>>;
    fn open_write(&mut self, name: &str) -> io::Result<Box<dyn Write>>;
    /// Names of the program files available.
    fn list(&mut self) -> io::Result<Vec<String>>;
}

/// Names without an extension get `.BAS`.
pub fn program_name(name: &str) -> String {
    if name.contains('.') {
        name.to_string()
    } else {
        format!("{}.BAS", name)
    }
}

fn is_program(name: &str) -> bool {
    name.to_ascii_uppercase().ends_with(".BAS")
}

/// Files in a directory of the host.
#[derive(Debug, Clone)]
pub struct DiskFiles {
    dir: PathBuf,
}

impl DiskFiles {
    pub fn new<P: Into<PathBuf>>(dir: P) -> DiskFiles {
        DiskFiles { dir: dir.into() }
    }

    /// The directory named by `BASIC_DIR`, else the working directory.
    pub fn from_env() -> DiskFiles {
        match std::env::var_os("BASIC_DIR") {
            Some(dir) => DiskFiles::new(dir),
            None => DiskFiles::new("."),
        }
    }
}

impl FileSystem for DiskFiles {
    fn open_read(&mut self, name: &str) -> io::Result<Box<dyn Read>> {
        let file = std::fs::File::open(self.dir.join(program_name(name)))?;
        Ok(Box::new(io::BufReader::new(file)))
    }

    fn open_write(&mut self, name: &str) -> io::Result<Box<dyn Write>> {
        let file = std::fs::File::create(self.dir.join(program_name(name)))?;
        Ok(Box::new(io::BufWriter::new(file)))
    }

    fn list(&mut self) -> io::Result<Vec<String>> {
        let mut names = vec![];
        for entry in std::fs::read_dir(&self.dir)? {
            let name = entry?.file_name().to_string_lossy().to_string();
            if is_program(&name) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Files held in memory. Clones share the same files.
#[derive(Debug, Clone, Default)]
pub struct MemoryFiles {
    files: Rc<RefCell<BTreeMap<String, Vec<u8>>>>,
}

impl MemoryFiles {
    pub fn insert(&self, name: &str, text: &str) {
        self.files
            .borrow_mut()
            .insert(program_name(name), text.as_bytes().to_vec());
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.files
            .borrow()
            .get(&program_name(name))
            .map(|bytes| String::from_utf8_lossy(bytes).to_string())
    }
}

struct MemoryWriter {
    files: Rc<RefCell<BTreeMap<String, Vec<u8>>>>,
    name: String,
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.files
            .borrow_mut()
            .entry(self.name.clone())
            .or_default()
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl FileSystem for MemoryFiles {
    fn open_read(&mut self, name: &str) -> io::Result<Box<dyn Read>> {
        match self.files.borrow().get(&program_name(name)) {
            Some(bytes) => Ok(Box::new(io::Cursor::new(bytes.clone()))),
            None => Err(io::Error::new(io::ErrorKind::NotFound, name.to_string())),
        }
    }

    fn open_write(&mut self, name: &str) -> io::Result<Box<dyn Write>> {
        let name = program_name(name);
        self.files.borrow_mut().insert(name.clone(), vec![]);
        Ok(Box::new(MemoryWriter {
            files: self.files.clone(),
            name,
        }))
    }

    fn list(&mut self) -> io::Result<Vec<String>> {
        Ok(self
            .files
            .borrow()
            .keys()
            .filter(|name| is_program(name))
            .cloned()
            .collect())
    }
}
