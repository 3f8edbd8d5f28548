use crate::config::CodecConfig;
use crate::core::dfs::DfsCodec;
use crate::core::mesh::MeshPayload;
use crate::core::volume::ScalarVolume;
use crate::error::{constants, Result, ShapeError};
use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};
use tracing::debug;

type ReaderFn = dyn Fn(&Path) -> Result<MeshPayload> + Send + Sync + 'static;
type WriterFn = dyn Fn(&Path, &MeshPayload) -> Result<()> + Send + Sync + 'static;

/// Routes shape files to a reader or writer by file extension.
///
/// Formats this crate does not implement (VTK polydata, curve files) can be
/// plugged in with [`FormatDispatcher::register_reader`] and
/// [`FormatDispatcher::register_writer`].
#[derive(Clone)]
pub struct FormatDispatcher {
    readers: Arc<RwLock<HashMap<Cow<'static, str>, Box<ReaderFn>>>>,
    writers: Arc<RwLock<HashMap<Cow<'static, str>, Box<WriterFn>>>>,
}

impl Default for FormatDispatcher {
    fn default() -> Self {
        Self::with_defaults(&CodecConfig::default())
    }
}

impl FormatDispatcher {
    /// Empty registry
    pub fn new() -> Self {
        Self {
            readers: Arc::new(RwLock::new(HashMap::new())),
            writers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Registry with the built-in `.dfs` reader/writer and `.mgh` overlay reader.
    ///
    /// An `.mgh` read yields a payload with no faces or vertices and the voxel
    /// values as `attributes`. It is an overlay carrier, not a surface: it does not
    /// satisfy [`MeshPayload::validate`], so writing it back out fails with
    /// `InvalidAttachment`. Attach it to a surface with
    /// [`MeshPayload::attach_overlay`] instead.
    pub fn with_defaults(config: &CodecConfig) -> Self {
        let codec = DfsCodec::from_config(config);
        let volume_config = config.clone();

        let mut readers = HashMap::<Cow<'static, str>, Box<ReaderFn>>::new();
        readers.insert(
            Cow::Borrowed("dfs"),
            Box::new(move |path: &Path| codec.read(path)),
        );
        readers.insert(
            Cow::Borrowed("mgh"),
            Box::new(move |path: &Path| -> Result<MeshPayload> {
                let volume = ScalarVolume::read(path, &volume_config)?;
                Ok(MeshPayload::default().with_attributes(volume.data))
            }),
        );

        let mut writers = HashMap::<Cow<'static, str>, Box<WriterFn>>::new();
        writers.insert(
            Cow::Borrowed("dfs"),
            Box::new(move |path: &Path, mesh: &MeshPayload| codec.write(path, mesh)),
        );

        Self {
            readers: Arc::new(RwLock::new(readers)),
            writers: Arc::new(RwLock::new(writers)),
        }
    }

    pub fn register_reader<F>(&self, extension: &str, reader: F) -> Result<()>
    where
        F: Fn(&Path) -> Result<MeshPayload> + Send + Sync + 'static,
    {
        let mut readers = self
            .readers
            .write()
            .map_err(|_| ShapeError::Custom(constants::ERR_DISPATCHER_WRITE_LOCK.to_string()))?;

        readers.insert(Cow::Owned(normalize(extension)), Box::new(reader));
        Ok(())
    }

    pub fn register_writer<F>(&self, extension: &str, writer: F) -> Result<()>
    where
        F: Fn(&Path, &MeshPayload) -> Result<()> + Send + Sync + 'static,
    {
        let mut writers = self
            .writers
            .write()
            .map_err(|_| ShapeError::Custom(constants::ERR_DISPATCHER_WRITE_LOCK.to_string()))?;

        writers.insert(Cow::Owned(normalize(extension)), Box::new(writer));
        Ok(())
    }

    pub fn read<P: AsRef<Path>>(&self, path: P) -> Result<MeshPayload> {
        let path = path.as_ref();
        let extension = get_extension(path);

        let readers = self
            .readers
            .read()
            .map_err(|_| ShapeError::Custom(constants::ERR_DISPATCHER_READ_LOCK.to_string()))?;

        debug!(path = %path.display(), extension = %extension, "Dispatching read");
        match readers.get(&*extension) {
            Some(reader) => reader(path),
            None => Err(unsupported(&extension, readers.keys())),
        }
    }

    pub fn write<P: AsRef<Path>>(&self, path: P, mesh: &MeshPayload) -> Result<()> {
        let path = path.as_ref();
        let extension = get_extension(path);

        let writers = self
            .writers
            .read()
            .map_err(|_| ShapeError::Custom(constants::ERR_DISPATCHER_READ_LOCK.to_string()))?;

        debug!(path = %path.display(), extension = %extension, "Dispatching write");
        match writers.get(&*extension) {
            Some(writer) => writer(path, mesh),
            None => Err(unsupported(&extension, writers.keys())),
        }
    }

    pub fn supports_read(&self, extension: &str) -> bool {
        self.readers
            .read()
            .map(|r| r.contains_key(normalize(extension).as_str()))
            .unwrap_or(false)
    }

    pub fn supports_write(&self, extension: &str) -> bool {
        self.writers
            .read()
            .map(|w| w.contains_key(normalize(extension).as_str()))
            .unwrap_or(false)
    }

    /// Every extension with a reader or a writer, sorted, with leading dot
    pub fn supported_extensions(&self) -> Vec<String> {
        let mut all: Vec<String> = Vec::new();
        if let Ok(readers) = self.readers.read() {
            all.extend(readers.keys().map(|k| format!(".{k}")));
        }
        if let Ok(writers) = self.writers.read() {
            all.extend(writers.keys().map(|k| format!(".{k}")));
        }
        all.sort();
        all.dedup();
        all
    }
}

/// Lower-case extension without the leading dot.
#[inline]
fn normalize(extension: &str) -> String {
    extension.trim_start_matches('.').to_ascii_lowercase()
}

/// Extension of `path` for routing; borrowed when it is already lower-case.
#[inline]
fn get_extension(path: &Path) -> Cow<'_, str> {
    match path.extension().map(|e| e.to_string_lossy()) {
        Some(ext) if ext.chars().any(|c| c.is_ascii_uppercase()) => {
            Cow::Owned(ext.to_ascii_lowercase())
        }
        Some(ext) => ext,
        None => Cow::Borrowed(""),
    }
}

fn unsupported<'a, I>(extension: &str, keys: I) -> ShapeError
where
    I: Iterator<Item = &'a Cow<'static, str>>,
{
    let mut supported: Vec<String> = keys.map(|k| format!(".{k}")).collect();
    supported.sort();
    ShapeError::UnsupportedExtension {
        extension: format!(".{extension}"),
        supported,
    }
}
