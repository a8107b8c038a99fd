use bincode::{deserialize_from, serialize_into};
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use log::debug;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::diagram::{BlockContent, Diagram};

/// Portable JSON form of a diagram's blocks.
#[derive(Debug, Serialize, Deserialize)]
pub struct DiagramDocument {
    /// RFC 3339 timestamp of the export
    #[serde(default)]
    pub saved_at: String,

    pub blocks: Vec<BlockContent>,
}

pub fn save_diagram(diagram: &Diagram, filename: impl AsRef<Path>) -> std::io::Result<()> {
    let file = File::create(filename.as_ref())?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut writer = std::io::BufWriter::new(encoder);

    serialize_into(&mut writer, diagram)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    writer.into_inner().map_err(|e| e.into_error())?.finish()?;

    debug!(
        "saved {} blocks to {}",
        diagram.len(),
        filename.as_ref().display()
    );
    Ok(())
}

pub fn load_diagram(filename: impl AsRef<Path>) -> std::io::Result<Diagram> {
    let file = File::open(filename.as_ref())?;
    let decoder = GzDecoder::new(file);
    let mut reader = std::io::BufReader::new(decoder);

    let stored: Diagram = deserialize_from(&mut reader)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

    // The stored counter is not trusted; ids continue after the largest block id.
    Ok(Diagram::from_blocks(stored.blocks))
}

/// Writes the diagram's slot text as pretty JSON.
///
/// # Examples
/// ```no_run
/// use blockcalc::diagram::Diagram;
/// use blockcalc::saving::export_json;
///
/// let mut diagram = Diagram::new();
/// diagram.add_block("5", "*", "20");
/// if let Err(e) = export_json(&diagram, "diagram.json") {
///     eprintln!("Failed to export: {}", e);
/// }
/// ```
pub fn export_json(diagram: &Diagram, filepath: impl AsRef<Path>) -> Result<(), Box<dyn Error>> {
    let document = DiagramDocument {
        saved_at: chrono::Local::now().to_rfc3339(),
        blocks: diagram.contents(),
    };
    let json = serde_json::to_string_pretty(&document)?;
    let mut file = File::create(filepath)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

/// Reads a JSON export back into a fresh diagram.
///
/// Accepts either a full [`DiagramDocument`] or a bare array of blocks.
/// Blocks get new ids in file order.
pub fn import_json(filepath: impl AsRef<Path>) -> Result<Diagram, Box<dyn Error>> {
    let contents = std::fs::read_to_string(filepath)?;
    let blocks = parse_blocks_json(&contents)?;
    let mut diagram = Diagram::new();
    diagram.load_contents(&blocks);
    Ok(diagram)
}

fn parse_blocks_json(contents: &str) -> Result<Vec<BlockContent>, Box<dyn Error>> {
    if contents.trim_start().starts_with('[') {
        return Ok(serde_json::from_str(contents)?);
    }
    let document: DiagramDocument = serde_json::from_str(contents)?;
    Ok(document.blocks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_array_is_accepted() {
        let blocks =
            parse_blocks_json(r##"[{"left":"5","operator":"*","right":"20"},{"left":"#1","right":"1"}]"##)
                .unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].operator, "");
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(parse_blocks_json("{\"blocks\": 3}").is_err());
        assert!(parse_blocks_json("not json").is_err());
    }
}
