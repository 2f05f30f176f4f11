//! Background compilation of a store into a new `.spr` file.
//!
//! The worker writes the header and a zeroed address table, appends every
//! record, then seeks back and fills in the table. Records are taken from a
//! snapshot of the overlay or copied verbatim from the backing file.

use std::{
	collections::HashMap,
	fs::File as FsFile,
	io::{BufReader, BufWriter, Seek, SeekFrom, Write},
	path::PathBuf,
	sync::{
		Arc,
		atomic::{AtomicBool, Ordering},
	},
};

use crossbeam_channel::{Receiver, Sender};
use log::debug;

use crate::file::{FileType, OtFileError};

use super::{
	Header,
	constants::{COLORKEY, MAX_PAYLOAD_SIZE, PROGRESS_INTERVAL},
	read_address_table, read_payload,
};

/// Shared flag used to stop a compile between records.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
	flag: Arc<AtomicBool>,
}

impl CancellationToken {
	/// Creates a token that is not cancelled.
	pub fn new() -> Self {
		Self::default()
	}

	/// Requests cancellation.
	pub fn cancel(&self) {
		self.flag.store(true, Ordering::Release);
	}

	/// Returns `true` once [`CancellationToken::cancel`] was called.
	pub fn is_cancelled(&self) -> bool {
		self.flag.load(Ordering::Acquire)
	}
}

/// Caller side of a running compile.
///
/// Progress values run from 0 to 100 and are advisory. The result is applied
/// by [`Store::finish_compile`](super::Store::finish_compile).
#[derive(Debug, Clone)]
pub struct CompileHandle {
	token: CancellationToken,
	progress: Receiver<u8>,
}

impl CompileHandle {
	/// Requests cancellation of the compile.
	pub fn cancel(&self) {
		self.token.cancel();
	}

	/// The compile's cancellation token.
	pub fn token(&self) -> &CancellationToken {
		&self.token
	}

	/// Progress reports in percent.
	pub fn progress(&self) -> &Receiver<u8> {
		&self.progress
	}
}

/// Result of [`Store::save`](super::Store::save).
#[derive(Debug)]
pub enum SaveStatus {
	/// Nothing to write, the target is the current file
	Unchanged,

	/// The unchanged file was copied to the target and reopened there
	Copied,

	/// A compile is running on a worker thread
	Compiling(CompileHandle),
}

/// How a compile ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompileOutcome {
	/// The target file was replaced
	Compiled,

	/// Cancelled before completion, no file was written
	Cancelled,
}

/// Snapshot of everything the worker needs.
pub(super) struct CompileJob {
	pub(super) source: Option<PathBuf>,
	pub(super) source_header_size: u64,
	pub(super) source_count: u32,
	pub(super) header: Header,
	pub(super) overlay: HashMap<u32, Vec<u8>>,
	pub(super) output: PathBuf,
	pub(super) token: CancellationToken,
	pub(super) progress: Sender<u8>,
}

impl CompileJob {
	/// Creates the progress channel and caller handle for a job.
	pub(super) fn channel(token: CancellationToken) -> (CompileHandle, Sender<u8>) {
		let (sender, receiver) = crossbeam_channel::unbounded();
		let handle = CompileHandle {
			token,
			progress: receiver,
		};
		(handle, sender)
	}

	/// Runs the compile into `output`.
	///
	/// The output is owned by the caller, which discards it unless the
	/// compile ends with [`CompileOutcome::Compiled`].
	pub(super) fn run(self) -> Result<CompileOutcome, OtFileError> {
		let count = self.header.count;

		let mut source = match &self.source {
			Some(path) => {
				let mut reader = BufReader::new(FsFile::open(path)?);
				let table = read_address_table(&mut reader, self.source_header_size, self.source_count)?;
				Some((reader, table))
			}
			None => None,
		};

		let mut writer = BufWriter::new(FsFile::create(&self.output)?);
		self.header.write_to(&mut writer)?;

		let table_start = self.header.size();
		writer.write_all(&vec![0u8; count as usize * 4])?;

		let mut addresses = vec![0u32; count as usize];
		let mut position = table_start + count as u64 * 4;

		for id in 1..=count {
			if self.token.is_cancelled() {
				debug!("Compile cancelled at sprite {id}");
				return Ok(CompileOutcome::Cancelled);
			}

			// Empty overlay payloads are blank; source records are copied as
			// they are, empty ones included
			let payload = match self.overlay.get(&id) {
				Some(payload) if payload.is_empty() => None,
				Some(payload) => Some(payload.clone()),
				None => match source.as_mut() {
					Some((reader, table)) if id <= self.source_count => {
						match table[id as usize - 1] {
							0 => None,
							address => Some(read_payload(reader, address)?),
						}
					}
					_ => None,
				},
			};

			if let Some(payload) = payload {
				let length = u16::try_from(payload.len()).map_err(|_| OtFileError::PayloadTooLarge {
					file_type: FileType::Spr,
					size: payload.len(),
					max: MAX_PAYLOAD_SIZE,
				})?;
				let address = u32::try_from(position).map_err(|_| OtFileError::PayloadTooLarge {
					file_type: FileType::Spr,
					size: position as usize,
					max: u32::MAX as usize,
				})?;

				writer.write_all(&COLORKEY)?;
				writer.write_all(&length.to_le_bytes())?;
				writer.write_all(&payload)?;

				addresses[id as usize - 1] = address;
				position += (COLORKEY.len() + 2 + payload.len()) as u64;
			}

			if id % PROGRESS_INTERVAL == 0 {
				let _ = self.progress.send((id as u64 * 100 / count as u64) as u8);
			}
		}

		writer.seek(SeekFrom::Start(table_start))?;
		for address in &addresses {
			writer.write_all(&address.to_le_bytes())?;
		}
		writer.flush()?;

		let _ = self.progress.send(100);
		Ok(CompileOutcome::Compiled)
	}
}
