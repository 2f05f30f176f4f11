//! File-backed sprite store.

use std::{
	collections::HashMap,
	fs::{self, File as FsFile},
	io::{self, BufReader},
	path::{Path, PathBuf},
	thread::{self, JoinHandle},
};

use crossbeam_channel::Receiver;
use log::{debug, warn};
use tempfile::TempPath;

use crate::file::{
	FileType, OtFileError,
	sprite::Sprite,
	version::{ClientFeatures, Version},
};

use super::{
	CancellationToken, Header,
	compile::{CompileJob, CompileOutcome, SaveStatus},
	constants::{MAX_PAYLOAD_SIZE, MAX_U16_SPRITES},
	events::{ChangeKind, StoreEvent, Subscribers},
	read_address, read_payload,
};

/// Lifecycle state of a [`Store`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StoreState {
	/// No data
	#[default]
	Unloaded,

	/// Ready for reads and edits
	Loaded,

	/// A compile is running; reads are allowed, edits are rejected
	Compiling,
}

/// Compile running on a worker thread.
struct PendingCompile {
	worker: JoinHandle<Result<CompileOutcome, OtFileError>>,
	token: CancellationToken,
	target: PathBuf,
	/// Removed on drop unless persisted
	output: TempPath,
}

/// Indexed sprite container backed by a `.spr` file.
///
/// Sprites are read lazily from the backing file. Added, replaced and removed
/// sprites are kept in an overlay until the next [`Store::save`].
#[derive(Default)]
pub struct Store {
	state: StoreState,
	path: Option<PathBuf>,
	version: Option<Version>,
	extended: bool,
	transparency: bool,
	header_size: u64,

	/// Backing file
	reader: Option<BufReader<FsFile>>,

	/// Count stored in the backing file
	raw_count: u32,

	count: u32,
	overlay: HashMap<u32, Sprite>,
	changed: bool,

	subscribers: Subscribers,
	pending: Option<PendingCompile>,
}

impl std::fmt::Debug for Store {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Store")
			.field("state", &self.state)
			.field("path", &self.path)
			.field("count", &self.count)
			.field("changed", &self.changed)
			.field("overlay", &self.overlay.len())
			.finish_non_exhaustive()
	}
}

impl Store {
	/// Creates an unloaded store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Opens the `.spr` file at `path`.
	pub fn open(path: impl AsRef<Path>, version: Version, features: ClientFeatures) -> Result<Self, OtFileError> {
		let mut store = Self::new();
		store.load(path, version, features)?;
		Ok(store)
	}

	/// Creates a temporary store holding a single blank sprite.
	pub fn temporary(version: Version, features: ClientFeatures) -> Self {
		let mut store = Self::new();
		store.create(version, features);
		store
	}

	/// Resets the store to a temporary one holding a single blank sprite.
	///
	/// The store has no backing file until its first [`Store::save`].
	pub fn create(&mut self, version: Version, features: ClientFeatures) {
		self.unload();

		self.extended = features.extended_for(&version);
		self.transparency = features.transparency;
		self.header_size = Header::size_for(self.extended);
		self.version = Some(version);
		self.raw_count = 0;
		self.count = 1;
		self.state = StoreState::Loaded;

		debug!("Created temporary sprite store (extended: {})", self.extended);
		self.subscribers.emit(StoreEvent::Loaded);
	}

	/// Opens `path` as the backing file. Only the header is read.
	///
	/// # Errors
	///
	/// Returns [`OtFileError::InvalidSignature`] if the file signature does not
	/// match `version`, or an I/O error if the header cannot be read.
	pub fn load(
		&mut self,
		path: impl AsRef<Path>,
		version: Version,
		features: ClientFeatures,
	) -> Result<(), OtFileError> {
		self.unload();

		let extended = features.extended_for(&version);
		let (reader, header) = Self::open_backing(path.as_ref(), extended)?;
		if header.signature != version.spr_signature {
			return Err(OtFileError::InvalidSignature {
				file_type: FileType::Spr,
				expected: version.spr_signature,
				actual: header.signature,
			});
		}

		self.attach(reader, &header);
		self.path = Some(path.as_ref().to_path_buf());
		self.extended = extended;
		self.transparency = features.transparency;
		self.header_size = header.size();
		self.version = Some(version);
		self.state = StoreState::Loaded;

		debug!("Loaded {} ({} sprites)", path.as_ref().display(), self.count);
		self.subscribers.emit(StoreEvent::Loaded);
		Ok(())
	}

	/// Opens a backing file and reads its header.
	fn open_backing(path: &Path, extended: bool) -> Result<(BufReader<FsFile>, Header), OtFileError> {
		let file = FsFile::open(path)?;
		let length = file.metadata()?.len();
		let header_size = Header::size_for(extended);
		if length < header_size {
			return Err(OtFileError::insufficient_data(FileType::Spr, header_size as usize, length as usize));
		}

		let mut reader = BufReader::new(file);
		let header = Header::from_reader(&mut reader, extended)?;
		Ok((reader, header))
	}

	/// Makes `reader` the backing file and resets the index to its header.
	fn attach(&mut self, reader: BufReader<FsFile>, header: &Header) {
		self.reader = Some(reader);
		self.raw_count = header.count;
		self.count = header.count.max(1);
		self.overlay.clear();
		self.changed = false;
	}

	/// Reopens the backing file at `path`, unloading the store on failure.
	fn reopen(&mut self, path: &Path) -> Result<(), OtFileError> {
		match Self::open_backing(path, self.extended) {
			Ok((reader, header)) => {
				self.attach(reader, &header);
				self.path = Some(path.to_path_buf());
				Ok(())
			}
			Err(e) => {
				warn!("Failed to reopen {}: {e}", path.display());
				self.unload();
				Err(e)
			}
		}
	}

	/// Closes the file and drops all data.
	///
	/// A running compile is cancelled and its output discarded.
	pub fn unload(&mut self) {
		if let Some(pending) = self.pending.take() {
			pending.token.cancel();
			let _ = pending.worker.join();
			warn!("Discarded compile of {} on unload", pending.target.display());
		}

		if self.state == StoreState::Unloaded {
			return;
		}

		self.reader = None;
		self.path = None;
		self.version = None;
		self.raw_count = 0;
		self.count = 0;
		self.overlay.clear();
		self.changed = false;
		self.state = StoreState::Unloaded;

		debug!("Unloaded sprite store");
		self.subscribers.emit(StoreEvent::Unloaded);
	}

	/// Registers a new event receiver.
	pub fn subscribe(&mut self) -> Receiver<StoreEvent> {
		self.subscribers.subscribe()
	}

	/// Current lifecycle state.
	#[inline]
	pub fn state(&self) -> StoreState {
		self.state
	}

	/// Number of sprites; ids run from 1 to `count`.
	#[inline]
	pub fn count(&self) -> u32 {
		self.count
	}

	/// Returns `true` unless the store is unloaded.
	#[inline]
	pub fn is_loaded(&self) -> bool {
		self.state != StoreState::Unloaded
	}

	/// Returns `true` if there are unsaved edits.
	#[inline]
	pub fn is_changed(&self) -> bool {
		self.changed
	}

	/// Returns `true` if the store has no backing file yet.
	#[inline]
	pub fn is_temporary(&self) -> bool {
		self.is_loaded() && self.path.is_none()
	}

	/// Path of the backing file.
	#[inline]
	pub fn path(&self) -> Option<&Path> {
		self.path.as_deref()
	}

	/// Client version the store was opened with.
	#[inline]
	pub fn version(&self) -> Option<&Version> {
		self.version.as_ref()
	}

	/// Whether the header uses a 32-bit count.
	#[inline]
	pub fn is_extended(&self) -> bool {
		self.extended
	}

	/// Whether sprites keep their alpha channel.
	#[inline]
	pub fn transparency(&self) -> bool {
		self.transparency
	}

	/// Header size in bytes: 6, or 8 when extended.
	#[inline]
	pub fn header_size(&self) -> u64 {
		self.header_size
	}

	/// Returns `true` if `id` addresses a sprite of this store.
	#[inline]
	pub fn has_sprite_id(&self, id: u32) -> bool {
		id >= 1 && id <= self.count
	}

	/// Returns sprite `id`.
	///
	/// Id `0` always yields a blank sprite, even on an unloaded store. Other
	/// ids past [`Store::count`] yield `None`. Records that cannot be read are
	/// returned blank.
	pub fn get_sprite(&mut self, id: u32) -> Option<Sprite> {
		if id == 0 {
			return Some(Sprite::new(0, self.transparency));
		}
		if !self.is_loaded() || id > self.count {
			return None;
		}
		if let Some(sprite) = self.overlay.get(&id) {
			return Some(sprite.clone());
		}

		Some(self.read_sprite(id))
	}

	/// Expanded `B, G, R, A` pixels of sprite `id`.
	pub fn sprite_pixels(&mut self, id: u32) -> Option<Vec<u8>> {
		self.get_sprite(id).map(|sprite| sprite.pixels())
	}

	/// Lazy read of a sprite from the backing file.
	fn read_sprite(&mut self, id: u32) -> Sprite {
		if id > self.raw_count {
			return Sprite::new(id, self.transparency);
		}

		match self.read_record(id) {
			Ok(Some(payload)) => Sprite::from_compressed(id, self.transparency, payload),
			Ok(None) => Sprite::new(id, self.transparency),
			Err(e) => {
				warn!("Failed to read sprite {id}: {e}");
				Sprite::new(id, self.transparency)
			}
		}
	}

	fn read_record(&mut self, id: u32) -> Result<Option<Vec<u8>>, OtFileError> {
		let header_size = self.header_size;
		let Some(reader) = self.reader.as_mut() else {
			return Ok(None);
		};

		match read_address(reader, header_size, id)? {
			0 => Ok(None),
			address => read_payload(reader, address).map(Some),
		}
	}

	fn ensure_editable(&self) -> Result<(), OtFileError> {
		match self.state {
			StoreState::Unloaded => Err(OtFileError::NotLoaded),
			StoreState::Compiling => Err(OtFileError::CompileInProgress),
			StoreState::Loaded => Ok(()),
		}
	}

	fn ensure_in_range(&self, id: u32) -> Result<(), OtFileError> {
		if self.has_sprite_id(id) {
			Ok(())
		} else {
			Err(OtFileError::SpriteOutOfRange {
				id,
				count: self.count,
			})
		}
	}

	/// Gives `sprite` the store's id and alpha mode.
	///
	/// # Errors
	///
	/// Returns [`OtFileError::PayloadTooLarge`] if the payload does not fit a
	/// record.
	fn adopt(&self, mut sprite: Sprite, id: u32) -> Result<Sprite, OtFileError> {
		sprite.set_id(id);
		sprite.set_transparent(self.transparency);
		if sprite.len() > MAX_PAYLOAD_SIZE {
			return Err(OtFileError::PayloadTooLarge {
				file_type: FileType::Spr,
				size: sprite.len(),
				max: MAX_PAYLOAD_SIZE,
			});
		}
		Ok(sprite)
	}

	/// Id following `id`.
	fn next_id(id: u32) -> Result<u32, OtFileError> {
		id.checked_add(1).ok_or(OtFileError::TooManySprites {
			file_type: FileType::Spr,
			count: id as usize + 1,
			max: u32::MAX as usize,
		})
	}

	fn mark_changed(&mut self, kind: ChangeKind, ids: Vec<u32>) {
		self.changed = true;
		self.subscribers.emit(StoreEvent::Changed {
			kind,
			ids,
		});
	}

	/// Appends a sprite and returns its new id.
	///
	/// # Errors
	///
	/// Returns [`OtFileError::PayloadTooLarge`] if the payload does not fit a
	/// record; the store is left untouched.
	pub fn add_sprite(&mut self, sprite: Sprite) -> Result<u32, OtFileError> {
		self.ensure_editable()?;

		let id = Self::next_id(self.count)?;
		let sprite = self.adopt(sprite, id)?;
		self.overlay.insert(id, sprite);
		self.count = id;

		self.mark_changed(ChangeKind::Add, vec![id]);
		Ok(id)
	}

	/// Appends sprites in order and returns their new ids.
	///
	/// Nothing is added if any sprite is rejected.
	pub fn add_sprites(&mut self, sprites: Vec<Sprite>) -> Result<Vec<u32>, OtFileError> {
		self.ensure_editable()?;
		if sprites.is_empty() {
			return Ok(Vec::new());
		}

		let mut id = self.count;
		let mut adopted = Vec::with_capacity(sprites.len());
		for sprite in sprites {
			id = Self::next_id(id)?;
			adopted.push(self.adopt(sprite, id)?);
		}

		let ids: Vec<u32> = adopted.iter().map(Sprite::id).collect();
		self.overlay.extend(adopted.into_iter().map(|sprite| (sprite.id(), sprite)));
		self.count = id;

		self.mark_changed(ChangeKind::Add, ids.clone());
		Ok(ids)
	}

	/// Appends a sprite built from a `B, G, R, A` tile.
	pub fn add_pixels(&mut self, pixels: &[u8]) -> Result<u32, OtFileError> {
		let sprite = Sprite::from_pixels(0, self.transparency, pixels)?;
		self.add_sprite(sprite)
	}

	/// Current value of an in-range id, leaving the overlay untouched.
	fn current(&mut self, id: u32) -> Sprite {
		match self.overlay.get(&id) {
			Some(sprite) => sprite.clone(),
			None => self.read_sprite(id),
		}
	}

	/// Replaces sprite `id` and returns the sprite it replaced.
	///
	/// # Errors
	///
	/// Returns [`OtFileError::SpriteOutOfRange`] unless `1 <= id <= count`,
	/// and [`OtFileError::PayloadTooLarge`] if the payload does not fit a
	/// record.
	pub fn replace_sprite(&mut self, id: u32, sprite: Sprite) -> Result<Sprite, OtFileError> {
		self.ensure_editable()?;
		self.ensure_in_range(id)?;
		let sprite = self.adopt(sprite, id)?;

		let old = self.current(id);
		self.overlay.insert(id, sprite);

		self.mark_changed(ChangeKind::Replace, vec![id]);
		Ok(old)
	}

	/// Replaces several sprites; nothing changes if any id is out of range or
	/// any payload is rejected.
	pub fn replace_sprites(&mut self, sprites: Vec<(u32, Sprite)>) -> Result<Vec<Sprite>, OtFileError> {
		self.ensure_editable()?;
		let mut adopted = Vec::with_capacity(sprites.len());
		for (id, sprite) in sprites {
			self.ensure_in_range(id)?;
			adopted.push(self.adopt(sprite, id)?);
		}
		if adopted.is_empty() {
			return Ok(Vec::new());
		}

		let mut ids = Vec::with_capacity(adopted.len());
		let mut replaced = Vec::with_capacity(adopted.len());
		for sprite in adopted {
			let id = sprite.id();
			replaced.push(self.current(id));
			self.overlay.insert(id, sprite);
			ids.push(id);
		}

		self.mark_changed(ChangeKind::Replace, ids);
		Ok(replaced)
	}

	/// Replaces sprite `id` with a `B, G, R, A` tile.
	pub fn replace_pixels(&mut self, id: u32, pixels: &[u8]) -> Result<Sprite, OtFileError> {
		let sprite = Sprite::from_pixels(id, self.transparency, pixels)?;
		self.replace_sprite(id, sprite)
	}

	fn take(&mut self, id: u32) -> Sprite {
		let old = self.current(id);
		if id == self.count && self.count != 1 {
			self.overlay.remove(&id);
			self.count -= 1;
		} else {
			self.overlay.insert(id, Sprite::new(id, self.transparency));
		}
		old
	}

	/// Removes sprite `id` and returns it.
	///
	/// The last sprite is truncated away; any other sprite is blanked in
	/// place so ids stay stable. Sprite 1 is never truncated.
	pub fn remove_sprite(&mut self, id: u32) -> Result<Sprite, OtFileError> {
		self.ensure_editable()?;
		self.ensure_in_range(id)?;

		let old = self.take(id);
		self.mark_changed(ChangeKind::Remove, vec![id]);
		Ok(old)
	}

	/// Removes sprites in the given order.
	///
	/// All ids are checked against the count before anything changes. Ids
	/// that an earlier truncation already dropped are skipped.
	pub fn remove_sprites(&mut self, ids: &[u32]) -> Result<Vec<Sprite>, OtFileError> {
		self.ensure_editable()?;
		for &id in ids {
			self.ensure_in_range(id)?;
		}

		let mut removed_ids = Vec::with_capacity(ids.len());
		let mut removed = Vec::with_capacity(ids.len());
		for &id in ids {
			if id > self.count {
				continue;
			}
			removed.push(self.take(id));
			removed_ids.push(id);
		}

		if !removed_ids.is_empty() {
			self.mark_changed(ChangeKind::Remove, removed_ids);
		}
		Ok(removed)
	}

	/// Saves the store to `path`.
	///
	/// See [`Store::save_with`].
	pub fn save(&mut self, path: impl AsRef<Path>) -> Result<SaveStatus, OtFileError> {
		self.save_with(path, CancellationToken::new())
	}

	/// Saves the store to `path`, compiling with the given cancellation token.
	///
	/// * Unchanged store, same file (however `path` is spelled): nothing
	///   happens.
	/// * Unchanged store, other file: the file is copied and reopened there.
	/// * Otherwise a compile starts on a worker thread. Finish it with
	///   [`Store::finish_compile`] or [`Store::try_finish_compile`].
	///
	/// # Errors
	///
	/// Returns [`OtFileError::CompileInProgress`] while compiling,
	/// [`OtFileError::NotLoaded`] on an unloaded store and
	/// [`OtFileError::TooManySprites`] if a 16-bit header cannot hold the
	/// count.
	pub fn save_with(&mut self, path: impl AsRef<Path>, token: CancellationToken) -> Result<SaveStatus, OtFileError> {
		self.ensure_editable()?;
		let target = path.as_ref().to_path_buf();

		if !self.changed
			&& let Some(current) = self.path.clone()
		{
			if same_file(&current, &target) {
				return Ok(SaveStatus::Unchanged);
			}

			let output = temporary_output(&target)?;
			fs::copy(&current, &output)?;
			output.persist(&target).map_err(|e| e.error)?;
			self.reopen(&target)?;
			debug!("Copied {} to {}", current.display(), path.as_ref().display());
			return Ok(SaveStatus::Copied);
		}

		if !self.extended && self.count > MAX_U16_SPRITES {
			return Err(OtFileError::TooManySprites {
				file_type: FileType::Spr,
				count: self.count as usize,
				max: MAX_U16_SPRITES as usize,
			});
		}

		let signature = self.version.as_ref().map_or(0, |version| version.spr_signature);
		let output = temporary_output(&target)?;
		let (handle, progress) = CompileJob::channel(token.clone());
		let job = CompileJob {
			source: self.path.clone(),
			source_header_size: self.header_size,
			source_count: self.raw_count,
			header: Header {
				signature,
				count: self.count,
				extended: self.extended,
			},
			overlay: self.overlay.iter().map(|(&id, sprite)| (id, sprite.compressed_pixels().to_vec())).collect(),
			output: output.to_path_buf(),
			token: token.clone(),
			progress,
		};

		let worker = thread::Builder::new().name("spr-compile".into()).spawn(move || job.run())?;

		debug!("Compiling {} sprites into {}", self.count, target.display());
		self.pending = Some(PendingCompile {
			worker,
			token,
			target,
			output,
		});
		self.state = StoreState::Compiling;
		Ok(SaveStatus::Compiling(handle))
	}

	/// Waits for the running compile and applies its result.
	///
	/// On success the compiled file replaces the target and becomes the
	/// backing file; the overlay is cleared. On cancellation the store keeps
	/// its edits.
	///
	/// # Errors
	///
	/// Returns [`OtFileError::NoCompileInProgress`] if nothing is compiling, or
	/// the worker's error. If the compiled file cannot be reopened the store
	/// is unloaded.
	pub fn finish_compile(&mut self) -> Result<CompileOutcome, OtFileError> {
		let pending = self.pending.take().ok_or(OtFileError::NoCompileInProgress)?;
		self.state = StoreState::Loaded;

		let result = pending
			.worker
			.join()
			.map_err(|_| OtFileError::IoError(io::Error::other("compile worker panicked")))?;

		match result {
			Ok(CompileOutcome::Compiled) => {}
			Ok(CompileOutcome::Cancelled) => {
				debug!("Compile of {} cancelled", pending.target.display());
				self.subscribers.emit(StoreEvent::CompileCancelled);
				return Ok(CompileOutcome::Cancelled);
			}
			Err(e) => {
				warn!("Compile of {} failed: {e}", pending.target.display());
				return Err(e);
			}
		}

		// The old backing file may be the target
		self.reader = None;
		if let Err(e) = pending.output.persist(&pending.target) {
			// Keep the edits and read from the old file again
			if let Some(path) = self.path.clone() {
				match FsFile::open(&path) {
					Ok(file) => self.reader = Some(BufReader::new(file)),
					Err(reopen) => {
						warn!("Failed to reopen {}: {reopen}", path.display());
						self.unload();
					}
				}
			}
			return Err(e.error.into());
		}

		self.reopen(&pending.target)?;

		debug!("Compiled {} sprites", self.count);
		self.subscribers.emit(StoreEvent::Compiled);
		Ok(CompileOutcome::Compiled)
	}

	/// Applies the compile result if the worker has already ended.
	///
	/// Returns `Ok(None)` while the worker is still running.
	pub fn try_finish_compile(&mut self) -> Result<Option<CompileOutcome>, OtFileError> {
		match &self.pending {
			None => Err(OtFileError::NoCompileInProgress),
			Some(pending) if !pending.worker.is_finished() => Ok(None),
			Some(_) => self.finish_compile().map(Some),
		}
	}
}

impl Drop for Store {
	fn drop(&mut self) {
		if let Some(pending) = self.pending.take() {
			pending.token.cancel();
			let _ = pending.worker.join();
		}
	}
}

/// Returns `true` if `a` and `b` resolve to the same file.
///
/// Paths that cannot be resolved, such as a target that does not exist yet,
/// are compared as written.
fn same_file(a: &Path, b: &Path) -> bool {
	match (fs::canonicalize(a), fs::canonicalize(b)) {
		(Ok(a), Ok(b)) => a == b,
		_ => a == b,
	}
}

/// Reserves a uniquely named `<stem>.*.tmp` file next to `target`.
fn temporary_output(target: &Path) -> Result<TempPath, OtFileError> {
	let dir = match target.parent() {
		Some(parent) if !parent.as_os_str().is_empty() => parent,
		_ => Path::new("."),
	};
	let stem = target.file_stem().map(|stem| stem.to_string_lossy().into_owned()).unwrap_or_default();

	let file = tempfile::Builder::new().prefix(&format!("{stem}.")).suffix(".tmp").tempfile_in(dir)?;
	Ok(file.into_temp_path())
}
