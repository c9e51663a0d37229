//! Alignment file input
//!
//! Reads the alignment records of k-mer windows mapped against the genes of
//! interest. BAM is selected by a `.bam` extension; everything else is read as
//! SAM text.

#[cfg(feature = "io-sam")] pub mod sam;

#[cfg(feature = "io-sam")] pub use sam::SamParser;

use std::path::Path;

/// Alignment file flavours accepted as input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentFormat {
    Sam,
    Bam,
}

impl AlignmentFormat {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let is_bam = path
            .as_ref()
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("bam"));
        if is_bam {
            AlignmentFormat::Bam
        } else {
            AlignmentFormat::Sam
        }
    }
}

/// Read every alignment record of a SAM/BAM file
#[cfg(feature = "io-sam")]
pub fn read_alignment_file<P: AsRef<Path>>(path: P) -> crate::error::Result<Vec<crate::types::AlignmentRecord>> {
    let path = path.as_ref();
    let format = AlignmentFormat::from_path(path);
    log::info!("Reading {:?} alignments from {}", format, path.display());

    let records = SamParser::parse_file(path)?;
    log::info!("Read {} alignment records", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(AlignmentFormat::from_path("kmers.bam"), AlignmentFormat::Bam);
        assert_eq!(AlignmentFormat::from_path("KMERS.BAM"), AlignmentFormat::Bam);
        assert_eq!(AlignmentFormat::from_path("kmers.sam"), AlignmentFormat::Sam);
        assert_eq!(AlignmentFormat::from_path("kmers.sam.gz"), AlignmentFormat::Sam);
        assert_eq!(AlignmentFormat::from_path("kmers"), AlignmentFormat::Sam);
    }
}
