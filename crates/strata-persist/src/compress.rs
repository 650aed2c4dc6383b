use crate::error::PersistError;
use crate::format::CHUNK_FILE_SIZE;

/// Compress an encoded chunk with LZ4.
pub fn compress_chunk(data: &[u8]) -> Vec<u8> {
    lz4_flex::compress_prepend_size(data)
}

/// Decompress an LZ4 block, validating the output is one chunk file.
pub fn decompress_chunk(compressed: &[u8]) -> Result<Vec<u8>, PersistError> {
    let decompressed = lz4_flex::decompress_size_prepended(compressed)
        .map_err(|e| PersistError::DecompressError(e.to_string()))?;

    if decompressed.len() != CHUNK_FILE_SIZE {
        return Err(PersistError::Corrupt(format!(
            "chunk block decompressed to {} bytes, expected {CHUNK_FILE_SIZE}",
            decompressed.len()
        )));
    }

    Ok(decompressed)
}
