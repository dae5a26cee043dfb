use std::path::{Path, PathBuf};

use midly::Smf;
use tracing::debug;

use crate::error::{Result, TransposeError};
use crate::transpose::Transposition;

/// Extension every transposed file is written with, whatever the input had.
pub const OUTPUT_EXTENSION: &str = "mid";

/// Strip the last dot-delimited segment of the file name.
/// Directory components are never touched. A name without a dot is returned
/// unchanged.
pub fn remove_ext(path: &Path) -> PathBuf {
    let Some(name) = path.file_name() else {
        return path.to_path_buf();
    };
    let Some(name) = name.to_str() else {
        return path.with_extension("");
    };
    match name.rsplit_once('.') {
        Some((stem, _)) => path.with_file_name(stem),
        None => path.to_path_buf(),
    }
}

/// `<input without extension>_tp<shift>.mid`, e.g. `song_tp-3.mid`.
pub fn output_path(input: &Path, shift: Transposition) -> PathBuf {
    let mut out = remove_ext(input).into_os_string();
    out.push(format!("_tp{}.{}", shift, OUTPUT_EXTENSION));
    PathBuf::from(out)
}

/// Serialize `smf` to `path`, replacing whatever is there.
pub fn save_container(smf: &Smf<'_>, path: &Path) -> Result<()> {
    smf.save(path).map_err(|source| TransposeError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "Wrote transposed file");
    Ok(())
}
