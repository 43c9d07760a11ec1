//! Parses `lscpu`'s plain `Key:    Value` text output (not `lscpu -J`,
//! which isn't available on the older distros the dataset was captured
//! from) for the fields hydration needs: cache sizes, CPU flags, and
//! BogoMIPS (the latter doubling as the `bogomips` benchmark's score).

use std::collections::HashMap;

pub type Fields = HashMap<String, String>;

pub fn parse(text: &str) -> Fields {
    let mut fields = Fields::new();
    for line in text.lines() {
        if let Some((key, value)) = line.split_once(':') {
            fields.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    fields
}

/// `L1d cache:  32K` / `L1d cache:  32 KiB` → `32`. `lscpu` has changed its
/// cache-size units across distro vintages; this keeps only the leading
/// number and drops the unit, matching how the other cache fields are
/// stored (kibibytes, unitless).
pub fn cache_kib(fields: &Fields, key: &str) -> Option<u32> {
    let raw = fields.get(key)?;
    let digits: String = raw.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

pub fn bogomips(fields: &Fields) -> Option<f64> {
    fields.get("BogoMIPS")?.parse().ok()
}

pub fn flags(fields: &Fields) -> Vec<String> {
    fields
        .get("Flags")
        .map(|raw| raw.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Architecture:        x86_64
CPU(s):              4
L1d cache:           32K
L1i cache:           32K
L2 cache:            1024K
L3 cache:            36608K
BogoMIPS:            5999.98
Flags:               fpu vme de pse tsc msr pae mce cx8 apic sep
";

    #[test]
    fn parses_cache_sizes() {
        let fields = parse(SAMPLE);
        assert_eq!(cache_kib(&fields, "L1d cache"), Some(32));
        assert_eq!(cache_kib(&fields, "L3 cache"), Some(36608));
    }

    #[test]
    fn parses_bogomips_and_flags() {
        let fields = parse(SAMPLE);
        assert_eq!(bogomips(&fields), Some(5999.98));
        assert!(flags(&fields).contains(&"apic".to_string()));
        assert_eq!(flags(&fields).len(), 10);
    }
}
