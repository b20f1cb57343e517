//! In-memory stand-in for an open file, used by the unit tests.

use crate::attrs::AttrStore;
use crate::hasher::Subject;
use crate::timestamp::Timestamp;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};
use std::io::{self, Cursor, Read};

pub(crate) struct MemoryFile {
    content: Cursor<Vec<u8>>,
    attrs: RefCell<BTreeMap<String, Vec<u8>>>,
    // successive mtime samples; the last one repeats forever
    mtimes: RefCell<VecDeque<Timestamp>>,
    touched: RefCell<Vec<String>>,
    attr_writes: Cell<usize>,
    fail_reads: Cell<bool>,
    fail_writes: Cell<bool>,
    fail_timestamp_writes: Cell<bool>,
    fail_content: Cell<bool>,
}

impl MemoryFile {
    pub fn new(content: &[u8]) -> Self {
        Self {
            content: Cursor::new(content.to_vec()),
            attrs: RefCell::new(BTreeMap::new()),
            mtimes: RefCell::new(VecDeque::from([Timestamp::new(1_600_000_000, 1)])),
            touched: RefCell::new(Vec::new()),
            attr_writes: Cell::new(0),
            fail_reads: Cell::new(false),
            fail_writes: Cell::new(false),
            fail_timestamp_writes: Cell::new(false),
            fail_content: Cell::new(false),
        }
    }

    pub fn with_mtime(self, ts: Timestamp) -> Self {
        self.set_mtimes(&[ts]);
        self
    }

    pub fn set_mtimes(&self, samples: &[Timestamp]) {
        *self.mtimes.borrow_mut() = samples.iter().copied().collect();
    }

    pub fn rewind(&mut self) {
        self.content.set_position(0);
    }

    pub fn put_attr(&self, name: &str, value: &[u8]) {
        self.attrs.borrow_mut().insert(name.to_string(), value.to_vec());
    }

    pub fn attr(&self, name: &str) -> Option<Vec<u8>> {
        self.attrs.borrow().get(name).cloned()
    }

    pub fn attr_names(&self) -> Vec<String> {
        self.attrs.borrow().keys().cloned().collect()
    }

    /// Every attribute name passed to get/set/remove, in call order.
    pub fn touched(&self) -> Vec<String> {
        self.touched.borrow().clone()
    }

    pub fn attr_writes(&self) -> usize {
        self.attr_writes.get()
    }

    pub fn fail_reads(&self) {
        self.fail_reads.set(true);
    }

    pub fn fail_writes(&self) {
        self.fail_writes.set(true);
    }

    /// Fail only writes to the `user.shatag.ts*` attributes.
    pub fn fail_timestamp_writes(&self) {
        self.fail_timestamp_writes.set(true);
    }

    pub fn fail_content(&self) {
        self.fail_content.set(true);
    }
}

impl Read for MemoryFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.fail_content.get() {
            return Err(io::Error::new(io::ErrorKind::Other, "injected read failure"));
        }
        self.content.read(buf)
    }
}

impl AttrStore for MemoryFile {
    fn get_attr(&self, name: &str) -> io::Result<Option<Vec<u8>>> {
        self.touched.borrow_mut().push(name.to_string());
        if self.fail_reads.get() {
            return Err(io::Error::new(io::ErrorKind::Other, "injected getxattr failure"));
        }
        Ok(self.attr(name))
    }

    fn set_attr(&self, name: &str, value: &[u8]) -> io::Result<()> {
        self.touched.borrow_mut().push(name.to_string());
        let timestamp_attr = name.starts_with("user.shatag.ts");
        if self.fail_writes.get() || (timestamp_attr && self.fail_timestamp_writes.get()) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "injected setxattr failure"));
        }
        self.attr_writes.set(self.attr_writes.get() + 1);
        self.put_attr(name, value);
        Ok(())
    }

    fn remove_attr(&self, name: &str) -> io::Result<()> {
        self.touched.borrow_mut().push(name.to_string());
        if self.fail_writes.get() {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "injected removexattr failure"));
        }
        self.attrs
            .borrow_mut()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such attribute"))
    }
}

impl Subject for MemoryFile {
    fn mtime(&self) -> io::Result<Timestamp> {
        let mut samples = self.mtimes.borrow_mut();
        let ts = samples.front().copied().unwrap_or(Timestamp::ZERO);
        if samples.len() > 1 {
            samples.pop_front();
        }
        Ok(ts)
    }
}
