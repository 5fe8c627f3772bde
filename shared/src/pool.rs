use std::{
    ops::{Deref, DerefMut},
    sync::{Mutex, MutexGuard, PoisonError},
};

use replica_serde::{StreamReader, StreamWriter};

/// Recycles byte cursors used on the send and receive hot paths.
///
/// The pool grows on demand and is never capped. Readers and writers live
/// behind separate locks, independent of any session state, so acquiring a
/// cursor never contends with object lookups.
#[derive(Default)]
pub struct BufferPool {
    readers: Mutex<Vec<StreamReader>>,
    writers: Mutex<Vec<StreamWriter>>,
}

/// Idle cursor counts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub readers: usize,
    pub writers: usize,
}

impl BufferPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands out a reader positioned at the start of `bytes`.
    pub fn acquire_reader(&self, bytes: &[u8]) -> PooledReader<'_> {
        let mut reader = lock(&self.readers).pop().unwrap_or_default();
        reader.reset(bytes);
        PooledReader { pool: self, reader }
    }

    /// Hands out an empty writer.
    pub fn acquire_writer(&self) -> PooledWriter<'_> {
        let mut writer = lock(&self.writers).pop().unwrap_or_default();
        writer.reset();
        PooledWriter { pool: self, writer }
    }

    pub fn available(&self) -> PoolStats {
        PoolStats {
            readers: lock(&self.readers).len(),
            writers: lock(&self.writers).len(),
        }
    }

    fn release_reader(&self, mut reader: StreamReader) {
        reader.clear();
        lock(&self.readers).push(reader);
    }

    fn release_writer(&self, mut writer: StreamWriter) {
        writer.reset();
        lock(&self.writers).push(writer);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A reader on loan from a [`BufferPool`]; returns itself when dropped.
pub struct PooledReader<'p> {
    pool: &'p BufferPool,
    reader: StreamReader,
}

impl PooledReader<'_> {
    /// Returns the reader to the pool. Equivalent to dropping it.
    pub fn release(self) {}
}

impl Deref for PooledReader<'_> {
    type Target = StreamReader;

    fn deref(&self) -> &StreamReader {
        &self.reader
    }
}

impl DerefMut for PooledReader<'_> {
    fn deref_mut(&mut self) -> &mut StreamReader {
        &mut self.reader
    }
}

impl Drop for PooledReader<'_> {
    fn drop(&mut self) {
        let reader = std::mem::take(&mut self.reader);
        self.pool.release_reader(reader);
    }
}

/// A writer on loan from a [`BufferPool`]; returns itself when dropped.
pub struct PooledWriter<'p> {
    pool: &'p BufferPool,
    writer: StreamWriter,
}

impl PooledWriter<'_> {
    /// Returns the writer to the pool. Equivalent to dropping it.
    pub fn release(self) {}
}

impl Deref for PooledWriter<'_> {
    type Target = StreamWriter;

    fn deref(&self) -> &StreamWriter {
        &self.writer
    }
}

impl DerefMut for PooledWriter<'_> {
    fn deref_mut(&mut self) -> &mut StreamWriter {
        &mut self.writer
    }
}

impl Drop for PooledWriter<'_> {
    fn drop(&mut self) {
        let writer = std::mem::replace(&mut self.writer, StreamWriter::with_capacity(0));
        self.pool.release_writer(writer);
    }
}
