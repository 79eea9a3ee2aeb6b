use std::{
    collections::HashMap,
    fmt::Display,
    fs,
    io::{BufReader, Read, Seek, SeekFrom},
    path::{Path, PathBuf},
    sync::Arc,
    thread::{self, JoinHandle},
};

use bytes::Bytes;
use parking_lot::RwLock;
use rayon::iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator};
use tracing::{debug, info, warn};

use crate::{
    error::{ArchiveError, ResourceError},
    file_parsers::{
        FileParser,
        bif::{parser::read_bif, types::BundleFile},
        itm::{ItmParser, types::ItemDefinition},
        key::{
            KeyParser,
            types::{BundleDetail, KeyFile, Locator, ResourceDescriptor},
        },
        tda::{TdaParser, types::TableData},
    },
    path::{
        bundle_relative_path, find_child_case_insensitive, game_root, open_with_fallback,
        split_resource_name,
    },
    resource_type::ResourceType,
};

pub const OVERRIDE_DIR: &str = "override";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loading,
    Loaded,
    Failed,
}

/// Terminal outcome of a load, delivered once per load call
#[derive(Debug, Clone)]
pub enum LoadEvent {
    Loaded,
    Failed(Arc<ArchiveError>),
}

/// Lower-cased (name, type tag) => locator
#[derive(Debug, Default)]
pub struct ResourceIndex {
    lut: HashMap<(String, u16), Locator>,
}

impl ResourceIndex {
    /// Later duplicates replace earlier ones
    pub fn build(resources: &[ResourceDescriptor]) -> Self {
        let lut = resources
            .iter()
            .map(|r| ((r.name.to_lowercase(), r.type_tag), r.locator))
            .collect();

        Self { lut }
    }

    pub fn get(&self, name: &str, type_tag: u16) -> Option<Locator> {
        self.lut.get(&(name.to_lowercase(), type_tag)).copied()
    }

    pub fn len(&self) -> usize {
        self.lut.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lut.is_empty()
    }
}

/// A bundle listed in the master index. Missing bundles keep an empty slot so that locator
/// bundle indices stay positional.
#[derive(Debug)]
pub struct BundleSlot {
    pub name: String,
    relative: PathBuf,
    pub file: BundleFile,
}

/// Everything read from a game folder by one load. Immutable once built.
#[derive(Debug)]
pub struct GameArchive {
    root: PathBuf,
    override_dir: Option<PathBuf>,
    key: KeyFile,
    bundles: Vec<BundleSlot>,
    index: ResourceIndex,
}

fn load_bundle(root: &Path, index: usize, detail: &BundleDetail) -> BundleSlot {
    let relative = bundle_relative_path(&detail.name);

    let file = match open_with_fallback(root, &relative) {
        Ok((file, path)) => match read_bif(&mut BufReader::new(file)) {
            Ok(bundle) => {
                if bundle.trailing_bytes > 0 {
                    debug!(
                        "Bundle {path:?} has {} bytes after its entry tables",
                        bundle.trailing_bytes
                    );
                }
                bundle
            }
            Err(e) => {
                warn!("Failed to parse bundle {index} {path:?}: {e}");
                BundleFile::placeholder()
            }
        },
        Err(e) => {
            warn!("Failed to open bundle {index} {:?}: {e}", detail.name);
            BundleFile::placeholder()
        }
    };

    BundleSlot {
        name: detail.name.clone(),
        relative,
        file,
    }
}

/// Read exactly `size` bytes at `offset`, on a fresh file handle
fn read_range(
    root: &Path,
    relative: &Path,
    offset: u64,
    size: usize,
) -> Result<Bytes, ResourceError> {
    let (mut file, path) =
        open_with_fallback(root, relative).map_err(|source| ResourceError::Io {
            path: root.join(relative),
            source,
        })?;

    file.seek(SeekFrom::Start(offset))
        .map_err(|source| ResourceError::Io {
            path: path.clone(),
            source,
        })?;

    // `size` comes from the bundle, so let the read decide how much to allocate
    let mut buf = Vec::new();
    file.take(size as u64)
        .read_to_end(&mut buf)
        .map_err(|source| ResourceError::Io {
            path: path.clone(),
            source,
        })?;

    if buf.len() != size {
        return Err(ResourceError::ShortRead {
            path,
            offset,
            expected: size,
            actual: buf.len(),
        });
    }

    Ok(Bytes::from(buf))
}

impl GameArchive {
    /// Load the master index at `key_path` and every bundle it lists. Bundles are looked up
    /// relative to the master index's folder.
    pub fn open(key_path: &Path) -> Result<Self, ArchiveError> {
        let contents = fs::read(key_path).map_err(|source| ArchiveError::ReadIndex {
            path: key_path.to_path_buf(),
            source,
        })?;
        let key = KeyParser
            .parse(&contents)
            .map_err(|source| ArchiveError::InvalidIndex {
                path: key_path.to_path_buf(),
                source,
            })?;

        let root = game_root(key_path).to_path_buf();

        // Order is preserved, so slot i is bundle i
        let bundles: Vec<_> = key
            .bundles
            .par_iter()
            .enumerate()
            .map(|(i, detail)| load_bundle(&root, i, detail))
            .collect();

        let index = ResourceIndex::build(&key.resources);

        let override_dir = find_child_case_insensitive(&root, OVERRIDE_DIR).filter(|p| p.is_dir());

        let missing = bundles.iter().filter(|b| b.file.is_placeholder()).count();
        info!(
            "Loaded {:?}: {} resources in {} bundles ({missing} unavailable)",
            key_path,
            index.len(),
            bundles.len(),
        );

        Ok(Self {
            root,
            override_dir,
            key,
            bundles,
            index,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn override_dir(&self) -> Option<&Path> {
        self.override_dir.as_deref()
    }

    pub fn key(&self) -> &KeyFile {
        &self.key
    }

    pub fn index(&self) -> &ResourceIndex {
        &self.index
    }

    pub fn bundles(&self) -> &[BundleSlot] {
        &self.bundles
    }

    /// Every resource in the master index, in index order and original case
    pub fn entries(&self) -> impl Iterator<Item = &ResourceDescriptor> {
        self.key.resources.iter()
    }

    pub fn locate(&self, name: &str, ty: ResourceType) -> Option<Locator> {
        self.index.get(name, ty.tag())
    }

    /// Loose file from the override folder, trying the exact then lower-cased name
    pub fn read_override(&self, filename: &str) -> Option<Bytes> {
        let dir = self.override_dir.as_ref()?;

        [filename.to_string(), filename.to_lowercase()]
            .iter()
            .find_map(|name| fs::read(dir.join(name)).ok())
            .map(Bytes::from)
    }

    /// "name.ext": override folder first, then the bundles
    pub fn read(&self, filename: &str) -> Result<Bytes, ResourceError> {
        if let Some(contents) = self.read_override(filename) {
            return Ok(contents);
        }

        let (name, ty) = split_resource_name(filename)?;
        self.read_default(name, ty)
    }

    /// Override folder first, then the bundles
    pub fn read_typed(&self, name: &str, ty: ResourceType) -> Result<Bytes, ResourceError> {
        if let Some(contents) = self.read_override(&format!("{name}.{}", ty.extension())) {
            return Ok(contents);
        }

        self.read_default(name, ty)
    }

    /// Bundle contents only, ignoring the override folder
    pub fn read_default(&self, name: &str, ty: ResourceType) -> Result<Bytes, ResourceError> {
        let locator = self
            .locate(name, ty)
            .ok_or_else(|| ResourceError::NotFound(format!("{name}.{}", ty.extension())))?;

        let bundle_index = locator.bundle_index();
        let slot = self
            .bundles
            .get(bundle_index)
            .ok_or_else(|| ResourceError::BundleUnavailable {
                index: bundle_index,
                name: String::from("<not in master index>"),
            })?;
        if slot.file.is_placeholder() {
            return Err(ResourceError::BundleUnavailable {
                index: bundle_index,
                name: slot.name.clone(),
            });
        }

        let entry = slot
            .file
            .file_entries
            .get(locator.entry_index())
            .ok_or_else(|| ResourceError::EntryOutOfRange {
                name: slot.name.clone(),
                entry: locator.entry_index(),
            })?;

        read_range(
            &self.root,
            &slot.relative,
            entry.offset as u64,
            entry.size as usize,
        )
    }
}

impl GameArchive {
    /// Read with override precedence, then parse
    pub fn read_parsed<P: FileParser>(
        &self,
        parser: P,
        name: &str,
        ty: ResourceType,
    ) -> Result<P::Output, ResourceError> {
        let contents = self.read_typed(name, ty)?;

        parser
            .parse(&contents)
            .map_err(|source| ResourceError::Parse {
                name: format!("{name}.{}", ty.extension()),
                source,
            })
    }

    pub fn table(&self, name: &str) -> Result<TableData, ResourceError> {
        self.read_parsed(TdaParser, name, ResourceType::Tda)
    }

    pub fn item(&self, name: &str) -> Result<ItemDefinition, ResourceError> {
        self.read_parsed(ItmParser, name, ResourceType::Itm)
    }
}

#[derive(Debug, Default)]
enum State {
    #[default]
    Unloaded,
    Loading,
    Loaded(Arc<GameArchive>),
    Failed(Arc<ArchiveError>),
}

impl State {
    fn load_state(&self) -> LoadState {
        match self {
            State::Unloaded => LoadState::Unloaded,
            State::Loading => LoadState::Loading,
            State::Loaded(_) => LoadState::Loaded,
            State::Failed(_) => LoadState::Failed,
        }
    }
}

/// Owns the loaded game archive and guards it across reloads. Reads are refused until a load
/// has completed.
#[derive(Debug, Default)]
pub struct ResourceManager {
    state: RwLock<State>,
}

fn or_empty(what: impl Display, result: Result<Bytes, ResourceError>) -> Bytes {
    result.unwrap_or_else(|e| {
        warn!("Failed to read resource {what}: {e}");
        Bytes::new()
    })
}

impl ResourceManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LoadState {
        self.state.read().load_state()
    }

    /// Why the last load failed
    pub fn failure(&self) -> Option<Arc<ArchiveError>> {
        match &*self.state.read() {
            State::Failed(e) => Some(Arc::clone(e)),
            _ => None,
        }
    }

    /// Snapshot of the loaded archive
    pub fn archive(&self) -> Result<Arc<GameArchive>, ResourceError> {
        match &*self.state.read() {
            State::Loaded(archive) => Ok(Arc::clone(archive)),
            state => Err(ResourceError::NotLoaded(state.load_state())),
        }
    }

    /// Drops any previous archive and marks a load as in flight
    fn begin_load(&self) -> Result<(), ArchiveError> {
        let mut state = self.state.write();
        if matches!(*state, State::Loading) {
            return Err(ArchiveError::LoadInProgress);
        }
        *state = State::Loading;

        Ok(())
    }

    fn finish_load(&self, result: Result<GameArchive, ArchiveError>) -> LoadEvent {
        let (state, event) = match result {
            Ok(archive) => (State::Loaded(Arc::new(archive)), LoadEvent::Loaded),
            Err(e) => {
                warn!("Failed to load game archive: {e}");
                let e = Arc::new(e);
                (State::Failed(Arc::clone(&e)), LoadEvent::Failed(e))
            }
        };

        *self.state.write() = state;
        event
    }

    /// Load on the calling thread
    pub fn load(&self, key_path: impl AsRef<Path>) -> Result<(), Arc<ArchiveError>> {
        self.begin_load().map_err(Arc::new)?;

        match self.finish_load(GameArchive::open(key_path.as_ref())) {
            LoadEvent::Loaded => Ok(()),
            LoadEvent::Failed(e) => Err(e),
        }
    }

    /// Load on the calling thread, reporting the outcome through `notify`
    pub fn load_with(&self, key_path: impl AsRef<Path>, notify: impl FnOnce(LoadEvent)) {
        let event = match self.load(key_path) {
            Ok(()) => LoadEvent::Loaded,
            Err(e) => LoadEvent::Failed(e),
        };

        notify(event);
    }

    /// Load on a background thread. A load already in flight is refused before spawning.
    pub fn spawn_load(
        self: &Arc<Self>,
        key_path: PathBuf,
        notify: impl FnOnce(LoadEvent) + Send + 'static,
    ) -> Result<JoinHandle<()>, ArchiveError> {
        self.begin_load()?;

        let manager = Arc::clone(self);
        let handle = thread::spawn(move || {
            let event = manager.finish_load(GameArchive::open(&key_path));
            notify(event);
        });

        Ok(handle)
    }

    pub fn try_resource(&self, filename: &str) -> Result<Bytes, ResourceError> {
        self.archive()?.read(filename)
    }

    pub fn try_typed_resource(&self, name: &str, ty: ResourceType) -> Result<Bytes, ResourceError> {
        self.archive()?.read_typed(name, ty)
    }

    pub fn try_default_resource(
        &self,
        name: &str,
        ty: ResourceType,
    ) -> Result<Bytes, ResourceError> {
        self.archive()?.read_default(name, ty)
    }

    /// Contents of "name.ext", or empty if it can't be read
    pub fn resource(&self, filename: &str) -> Bytes {
        or_empty(filename, self.try_resource(filename))
    }

    pub fn typed_resource(&self, name: &str, ty: ResourceType) -> Bytes {
        or_empty(
            format_args!("{name}.{}", ty.extension()),
            self.try_typed_resource(name, ty),
        )
    }

    pub fn default_resource(&self, name: &str, ty: ResourceType) -> Bytes {
        or_empty(
            format_args!("{name}.{}", ty.extension()),
            self.try_default_resource(name, ty),
        )
    }
}
