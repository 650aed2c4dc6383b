use crate::error::PersistError;
use crate::format::{ArchiveHeader, FORMAT_VERSION, MAGIC};

/// Validate an archive header and return any compatibility warnings.
///
/// A seed mismatch produces a warning, not an error: saved chunks load
/// as stored, but slots missing from the archive regenerate from the
/// current seed and may not line up at chunk borders.
pub fn validate_header(header: &ArchiveHeader, current_seed: u64) -> Result<Vec<String>, PersistError> {
    if header.magic != MAGIC {
        return Err(PersistError::InvalidMagic);
    }

    if header.version != FORMAT_VERSION {
        return Err(PersistError::UnsupportedVersion(header.version));
    }

    let mut warnings = Vec::new();

    if header.world_seed != current_seed {
        warnings.push(format!(
            "World seed differs from this archive (archive: {}, current: {}). \
             Regenerated chunks will not match saved terrain.",
            header.world_seed, current_seed
        ));
    }

    Ok(warnings)
}
