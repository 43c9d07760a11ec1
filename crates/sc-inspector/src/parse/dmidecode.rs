//! Parses `dmidecode`'s text output into the blocks the hydration pass
//! needs: "Processor Information" (CPU manufacturer/family/model/speed) and
//! "Memory Device" (memory generation/speed).
//!
//! `dmidecode` prints one blank-line-separated block per DMI handle, each
//! starting with a type name on its own line followed by indented
//! `Key: Value` lines, e.g.:
//!
//! ```text
//! Handle 0x0001, DMI type 4, 42 bytes
//! Processor Information
//!         Family: Xeon
//!         Manufacturer: Intel(R) Corporation
//!         Version: Intel(R) Xeon(R) CPU @ 2.20GHz
//!         Current Speed: 2200 MHz
//! ```

use std::collections::HashMap;

/// One DMI block's `Key: Value` fields, keyed by the trimmed field name.
pub type Block = HashMap<String, String>;

/// Returns every block whose header line is `heading` (e.g. `"Processor
/// Information"` or `"Memory Device"` — dmidecode repeats the latter once
/// per populated memory slot).
pub fn blocks_named(text: &str, heading: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut lines = text.lines().peekable();
    while let Some(line) = lines.next() {
        if line.trim() != heading {
            continue;
        }
        let mut block = Block::new();
        while let Some(next) = lines.peek() {
            if next.trim().is_empty() || !next.starts_with(char::is_whitespace) {
                break;
            }
            let entry = lines.next().unwrap();
            if let Some((key, value)) = entry.trim().split_once(':') {
                block.insert(key.trim().to_string(), value.trim().to_string());
            }
        }
        blocks.push(block);
    }
    blocks
}

pub fn processor_blocks(text: &str) -> Vec<Block> {
    blocks_named(text, "Processor Information")
}

pub fn memory_device_blocks(text: &str) -> Vec<Block> {
    blocks_named(text, "Memory Device")
}

/// `Current Speed: 2200 MHz` → `2200`. Returns `None` for unpopulated
/// slots (`Unknown`, `Not Specified`, or a missing/unparseable number).
pub fn megahertz(block: &Block, key: &str) -> Option<u32> {
    block
        .get(key)?
        .split_whitespace()
        .next()?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Handle 0x0001, DMI type 4, 42 bytes
Processor Information
\tSocket Designation: CPU 0
\tFamily: Xeon
\tManufacturer: Intel(R) Corporation
\tVersion: Intel(R) Xeon(R) Platinum 8275CL CPU @ 3.00GHz
\tCurrent Speed: 3000 MHz

Handle 0x0002, DMI type 17, 40 bytes
Memory Device
\tSize: 16384 MB
\tSpeed: 2933 MT/s
";

    #[test]
    fn parses_processor_block() {
        let blocks = processor_blocks(SAMPLE);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].get("Manufacturer").unwrap(), "Intel(R) Corporation");
        assert_eq!(megahertz(&blocks[0], "Current Speed"), Some(3000));
    }

    #[test]
    fn parses_memory_device_block() {
        let blocks = memory_device_blocks(SAMPLE);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].get("Speed").unwrap(), "2933 MT/s");
    }

    #[test]
    fn missing_heading_yields_empty_vec() {
        assert!(blocks_named(SAMPLE, "Cache Information").is_empty());
    }
}
