//! Static table/column metadata for every entity of §3 (component A), used
//! both by the `CREATE TABLE` generator (§6.1/§6.2) and by the generic
//! upsert/hash machinery in [`crate::engine`]. Adding a table means adding
//! one entry to [`TABLES`]; nothing else needs to change (§6.1).

/// The storage class a column is emitted as, independent of dialect; the
/// dialect only decides the concrete type keyword (see [`crate::ddl`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    Integer,
    Real,
    Bool,
    /// JSON-valued column (§6.1): `cpus`, `gpus`, `storages`, `price_tiered`,
    /// `config_fields`, `config`, `aliases`, `cpu_flags`.
    Json,
    /// `observed_at`: timestamp without timezone, UTC (§6.1).
    Timestamp,
}

#[derive(Debug, Clone, Copy)]
pub struct ColumnSchema {
    pub name: &'static str,
    pub ty: ColumnType,
    pub nullable: bool,
    pub comment: &'static str,
}

const fn col(name: &'static str, ty: ColumnType, nullable: bool, comment: &'static str) -> ColumnSchema {
    ColumnSchema { name, ty, nullable, comment }
}

#[derive(Debug, Clone, Copy)]
pub struct ForeignKey {
    /// `fk_<table>_<col>_<referenced>` (§6.1).
    pub name: &'static str,
    pub columns: &'static [&'static str],
    pub referenced_table: &'static str,
    pub referenced_columns: &'static [&'static str],
}

#[derive(Debug, Clone, Copy)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: &'static [ColumnSchema],
    /// Declaration-order primary key columns; emitted as `pk_<table>`.
    pub primary_key: &'static [&'static str],
    pub foreign_keys: &'static [ForeignKey],
    /// Whether an `_scd` companion exists for this table (§3.3).
    pub has_scd: bool,
}

impl TableSchema {
    pub fn scd_table_name(&self) -> String {
        format!("{}_scd", self.name)
    }

    /// The SCD companion's primary key: the base table's PK with
    /// `observed_at` promoted into it (§3.3).
    pub fn scd_primary_key(&self) -> Vec<&'static str> {
        let mut pk = self.primary_key.to_vec();
        pk.push("observed_at");
        pk
    }
}

const META_STATUS: ColumnSchema = col("status", ColumnType::Text, false, "ACTIVE or INACTIVE; never deleted, only tombstoned");
const META_OBSERVED_AT: ColumnSchema = col("observed_at", ColumnType::Timestamp, false, "UTC timestamp of the observation that wrote this row");

const COUNTRY_COLUMNS: &[ColumnSchema] = &[
    col("country_id", ColumnType::Text, false, "ISO-3166 alpha-2 code"),
    col("continent", ColumnType::Text, false, "continent name"),
    META_STATUS,
    META_OBSERVED_AT,
];

const COMPLIANCE_FRAMEWORK_COLUMNS: &[ColumnSchema] = &[
    col("compliance_framework_id", ColumnType::Text, false, "framework identifier"),
    col("name", ColumnType::Text, false, "framework name"),
    col("abbreviation", ColumnType::Text, true, "short name"),
    col("description", ColumnType::Text, true, "free-text description"),
    col("logo", ColumnType::Text, true, "logo URL"),
    col("homepage", ColumnType::Text, true, "homepage URL"),
    META_STATUS,
    META_OBSERVED_AT,
];

const VENDOR_COLUMNS: &[ColumnSchema] = &[
    col("vendor_id", ColumnType::Text, false, "vendor identifier"),
    col("name", ColumnType::Text, false, "vendor display name"),
    col("logo", ColumnType::Text, true, "logo URL"),
    col("homepage", ColumnType::Text, false, "homepage URL"),
    col("country_id", ColumnType::Text, false, "HQ country"),
    col("state", ColumnType::Text, true, "HQ state/province"),
    col("city", ColumnType::Text, true, "HQ city"),
    col("address_line", ColumnType::Text, true, "HQ street address"),
    col("zip_code", ColumnType::Text, true, "HQ zip/postal code"),
    col("founding_year", ColumnType::Integer, false, "year the vendor was founded"),
    col("status_page", ColumnType::Text, true, "public status-page URL"),
    META_STATUS,
    META_OBSERVED_AT,
];

const VENDOR_COMPLIANCE_LINK_COLUMNS: &[ColumnSchema] = &[
    col("vendor_id", ColumnType::Text, false, "vendor identifier"),
    col("compliance_framework_id", ColumnType::Text, false, "framework identifier"),
    col("comment", ColumnType::Text, true, "free-text note on the certification"),
    META_STATUS,
    META_OBSERVED_AT,
];

const REGION_COLUMNS: &[ColumnSchema] = &[
    col("vendor_id", ColumnType::Text, false, "owning vendor"),
    col("region_id", ColumnType::Text, false, "vendor-scoped region identifier"),
    col("name", ColumnType::Text, false, "vendor's internal region name"),
    col("api_reference", ColumnType::Text, false, "identifier used in the vendor's API"),
    col("display_name", ColumnType::Text, false, "human-friendly name"),
    col("aliases", ColumnType::Json, false, "alternate names/identifiers"),
    col("country_id", ColumnType::Text, false, "country the region is located in"),
    col("state", ColumnType::Text, true, "state/province"),
    col("city", ColumnType::Text, true, "city"),
    col("address_line", ColumnType::Text, true, "street address"),
    col("zip_code", ColumnType::Text, true, "zip/postal code"),
    col("lon", ColumnType::Real, true, "longitude"),
    col("lat", ColumnType::Real, true, "latitude"),
    col("founding_year", ColumnType::Integer, true, "year the region opened"),
    col("green_energy", ColumnType::Bool, true, "whether the region runs on renewable energy"),
    META_STATUS,
    META_OBSERVED_AT,
];

const ZONE_COLUMNS: &[ColumnSchema] = &[
    col("vendor_id", ColumnType::Text, false, "owning vendor"),
    col("region_id", ColumnType::Text, false, "owning region"),
    col("zone_id", ColumnType::Text, false, "vendor-scoped zone identifier"),
    col("name", ColumnType::Text, false, "vendor's internal zone name"),
    col("api_reference", ColumnType::Text, false, "identifier used in the vendor's API"),
    col("display_name", ColumnType::Text, false, "human-friendly name"),
    META_STATUS,
    META_OBSERVED_AT,
];

const STORAGE_COLUMNS: &[ColumnSchema] = &[
    col("vendor_id", ColumnType::Text, false, "owning vendor"),
    col("storage_id", ColumnType::Text, false, "vendor-scoped storage identifier"),
    col("name", ColumnType::Text, false, "storage offering name"),
    col("description", ColumnType::Text, true, "free-text description"),
    col("storage_type", ColumnType::Text, false, "HDD, SSD, NVME_SSD or NETWORK"),
    col("max_iops", ColumnType::Integer, true, "maximum IOPS"),
    col("max_throughput", ColumnType::Real, true, "maximum throughput, MiB/s"),
    col("min_size", ColumnType::Real, true, "minimum volume size, GiB"),
    col("max_size", ColumnType::Real, true, "maximum volume size, GiB"),
    META_STATUS,
    META_OBSERVED_AT,
];

const SERVER_COLUMNS: &[ColumnSchema] = &[
    col("vendor_id", ColumnType::Text, false, "owning vendor"),
    col("server_id", ColumnType::Text, false, "vendor-scoped server identifier"),
    col("name", ColumnType::Text, false, "vendor's internal server name"),
    col("api_reference", ColumnType::Text, false, "identifier used in the vendor's API"),
    col("display_name", ColumnType::Text, false, "human-friendly name"),
    col("description", ColumnType::Text, true, "free-text description"),
    col("family", ColumnType::Text, true, "server family/series"),
    col("vcpus", ColumnType::Integer, false, "virtual CPU count"),
    col("hypervisor", ColumnType::Text, true, "hypervisor name"),
    col("cpu_allocation", ColumnType::Text, false, "SHARED, BURSTABLE or DEDICATED"),
    col("cpu_cores", ColumnType::Integer, true, "physical core count"),
    col("cpu_speed", ColumnType::Real, true, "clock speed, GHz"),
    col("cpu_architecture", ColumnType::Text, false, "ARM64, ARM64_MAC, I386, X86_64 or X86_64_MAC"),
    col("cpu_manufacturer", ColumnType::Text, true, "CPU manufacturer, standardized"),
    col("cpu_family", ColumnType::Text, true, "CPU family"),
    col("cpu_model", ColumnType::Text, true, "CPU model"),
    col("cpu_l1_cache", ColumnType::Integer, true, "L1 cache, bytes"),
    col("cpu_l2_cache", ColumnType::Integer, true, "L2 cache, bytes"),
    col("cpu_l3_cache", ColumnType::Integer, true, "L3 cache, bytes"),
    col("cpu_flags", ColumnType::Json, false, "CPU feature flags"),
    col("cpus", ColumnType::Json, false, "per-socket CPU details"),
    col("memory_amount", ColumnType::Integer, false, "memory size, MiB"),
    col("memory_generation", ColumnType::Text, true, "DDR3, DDR4 or DDR5"),
    col("memory_speed", ColumnType::Integer, true, "memory speed, MT/s"),
    col("memory_ecc", ColumnType::Bool, true, "whether memory is ECC"),
    col("gpu_count", ColumnType::Real, false, "GPU count, fractional for shared GPUs"),
    col("gpu_memory_min", ColumnType::Integer, true, "minimum per-GPU memory, MiB"),
    col("gpu_memory_total", ColumnType::Integer, true, "total GPU memory, MiB"),
    col("gpu_manufacturer", ColumnType::Text, true, "GPU manufacturer, standardized"),
    col("gpu_family", ColumnType::Text, true, "GPU family"),
    col("gpu_model", ColumnType::Text, true, "GPU model"),
    col("gpus", ColumnType::Json, false, "per-GPU details"),
    col("storage_size", ColumnType::Real, false, "attached local storage, GB"),
    col("storage_type", ColumnType::Text, true, "attached local storage type"),
    col("storages", ColumnType::Json, false, "per-disk details"),
    col("network_speed", ColumnType::Real, true, "network speed, Gbps"),
    col("inbound_traffic", ColumnType::Real, false, "included inbound traffic, GB/month"),
    col("outbound_traffic", ColumnType::Real, false, "included outbound traffic, GB/month"),
    col("ipv4", ColumnType::Integer, false, "included public IPv4 count"),
    META_STATUS,
    META_OBSERVED_AT,
];

const SERVER_PRICE_COLUMNS: &[ColumnSchema] = &[
    col("vendor_id", ColumnType::Text, false, "owning vendor"),
    col("region_id", ColumnType::Text, false, "region the price applies in"),
    col("zone_id", ColumnType::Text, false, "zone the price applies in"),
    col("server_id", ColumnType::Text, false, "priced server"),
    col("allocation", ColumnType::Text, false, "ONDEMAND, RESERVED or SPOT"),
    col("operating_system", ColumnType::Text, false, "operating system the price is quoted for"),
    col("unit", ColumnType::Text, false, "YEAR, MONTH, HOUR, GIB, GB or GB_MONTH"),
    col("price", ColumnType::Real, false, "price per unit"),
    col("price_upfront", ColumnType::Real, false, "one-time upfront price"),
    col("price_tiered", ColumnType::Json, false, "piecewise-constant tiered price"),
    col("currency", ColumnType::Text, false, "ISO-4217 currency code"),
    META_STATUS,
    META_OBSERVED_AT,
];

const STORAGE_PRICE_COLUMNS: &[ColumnSchema] = &[
    col("vendor_id", ColumnType::Text, false, "owning vendor"),
    col("region_id", ColumnType::Text, false, "region the price applies in"),
    col("storage_id", ColumnType::Text, false, "priced storage offering"),
    col("unit", ColumnType::Text, false, "YEAR, MONTH, HOUR, GIB, GB or GB_MONTH"),
    col("price", ColumnType::Real, false, "price per unit"),
    col("price_upfront", ColumnType::Real, false, "one-time upfront price"),
    col("price_tiered", ColumnType::Json, false, "piecewise-constant tiered price"),
    col("currency", ColumnType::Text, false, "ISO-4217 currency code"),
    META_STATUS,
    META_OBSERVED_AT,
];

const TRAFFIC_PRICE_COLUMNS: &[ColumnSchema] = &[
    col("vendor_id", ColumnType::Text, false, "owning vendor"),
    col("region_id", ColumnType::Text, false, "region the price applies in"),
    col("direction", ColumnType::Text, false, "IN or OUT"),
    col("unit", ColumnType::Text, false, "YEAR, MONTH, HOUR, GIB, GB or GB_MONTH"),
    col("price", ColumnType::Real, false, "price per unit"),
    col("price_upfront", ColumnType::Real, false, "one-time upfront price"),
    col("price_tiered", ColumnType::Json, false, "piecewise-constant tiered price"),
    col("currency", ColumnType::Text, false, "ISO-4217 currency code"),
    META_STATUS,
    META_OBSERVED_AT,
];

const IPV4_PRICE_COLUMNS: &[ColumnSchema] = &[
    col("vendor_id", ColumnType::Text, false, "owning vendor"),
    col("region_id", ColumnType::Text, false, "region the price applies in"),
    col("unit", ColumnType::Text, false, "YEAR, MONTH, HOUR, GIB, GB or GB_MONTH"),
    col("price", ColumnType::Real, false, "price per unit"),
    col("price_upfront", ColumnType::Real, false, "one-time upfront price"),
    col("price_tiered", ColumnType::Json, false, "piecewise-constant tiered price"),
    col("currency", ColumnType::Text, false, "ISO-4217 currency code"),
    META_STATUS,
    META_OBSERVED_AT,
];

const BENCHMARK_COLUMNS: &[ColumnSchema] = &[
    col("benchmark_id", ColumnType::Text, false, "benchmark identifier"),
    col("name", ColumnType::Text, false, "benchmark display name"),
    col("description", ColumnType::Text, true, "free-text description"),
    col("framework", ColumnType::Text, false, "benchmarking tool name"),
    col("config_fields", ColumnType::Json, false, "names/descriptions of the config parameters"),
    col("measurement", ColumnType::Text, true, "what is measured"),
    col("unit", ColumnType::Text, true, "unit of the score"),
    col("higher_is_better", ColumnType::Bool, false, "whether a higher score is better"),
    META_STATUS,
    META_OBSERVED_AT,
];

const BENCHMARK_SCORE_COLUMNS: &[ColumnSchema] = &[
    col("vendor_id", ColumnType::Text, false, "owning vendor"),
    col("server_id", ColumnType::Text, false, "benchmarked server"),
    col("benchmark_id", ColumnType::Text, false, "benchmark run"),
    col("config", ColumnType::Json, false, "run parameters, part of the primary key"),
    col("score", ColumnType::Real, false, "benchmark score"),
    col("note", ColumnType::Text, true, "free-text note"),
    META_STATUS,
    META_OBSERVED_AT,
];

pub const TABLES: &[TableSchema] = &[
    TableSchema {
        name: "country",
        columns: COUNTRY_COLUMNS,
        primary_key: &["country_id"],
        foreign_keys: &[],
        has_scd: false,
    },
    TableSchema {
        name: "compliance_framework",
        columns: COMPLIANCE_FRAMEWORK_COLUMNS,
        primary_key: &["compliance_framework_id"],
        foreign_keys: &[],
        has_scd: false,
    },
    TableSchema {
        name: "vendor",
        columns: VENDOR_COLUMNS,
        primary_key: &["vendor_id"],
        foreign_keys: &[ForeignKey {
            name: "fk_vendor_country_id_country",
            columns: &["country_id"],
            referenced_table: "country",
            referenced_columns: &["country_id"],
        }],
        has_scd: false,
    },
    TableSchema {
        name: "vendor_compliance_link",
        columns: VENDOR_COMPLIANCE_LINK_COLUMNS,
        primary_key: &["vendor_id", "compliance_framework_id"],
        foreign_keys: &[
            ForeignKey {
                name: "fk_vendor_compliance_link_vendor_id_vendor",
                columns: &["vendor_id"],
                referenced_table: "vendor",
                referenced_columns: &["vendor_id"],
            },
            ForeignKey {
                name: "fk_vendor_compliance_link_compliance_framework_id_compliance_framework",
                columns: &["compliance_framework_id"],
                referenced_table: "compliance_framework",
                referenced_columns: &["compliance_framework_id"],
            },
        ],
        has_scd: true,
    },
    TableSchema {
        name: "region",
        columns: REGION_COLUMNS,
        primary_key: &["vendor_id", "region_id"],
        foreign_keys: &[
            ForeignKey {
                name: "fk_region_vendor_id_vendor",
                columns: &["vendor_id"],
                referenced_table: "vendor",
                referenced_columns: &["vendor_id"],
            },
            ForeignKey {
                name: "fk_region_country_id_country",
                columns: &["country_id"],
                referenced_table: "country",
                referenced_columns: &["country_id"],
            },
        ],
        has_scd: true,
    },
    TableSchema {
        name: "zone",
        columns: ZONE_COLUMNS,
        primary_key: &["vendor_id", "region_id", "zone_id"],
        foreign_keys: &[ForeignKey {
            name: "fk_zone_region_id_region",
            columns: &["vendor_id", "region_id"],
            referenced_table: "region",
            referenced_columns: &["vendor_id", "region_id"],
        }],
        has_scd: true,
    },
    TableSchema {
        name: "storage",
        columns: STORAGE_COLUMNS,
        primary_key: &["vendor_id", "storage_id"],
        foreign_keys: &[ForeignKey {
            name: "fk_storage_vendor_id_vendor",
            columns: &["vendor_id"],
            referenced_table: "vendor",
            referenced_columns: &["vendor_id"],
        }],
        has_scd: true,
    },
    TableSchema {
        name: "server",
        columns: SERVER_COLUMNS,
        primary_key: &["vendor_id", "server_id"],
        foreign_keys: &[ForeignKey {
            name: "fk_server_vendor_id_vendor",
            columns: &["vendor_id"],
            referenced_table: "vendor",
            referenced_columns: &["vendor_id"],
        }],
        has_scd: true,
    },
    TableSchema {
        name: "server_price",
        columns: SERVER_PRICE_COLUMNS,
        primary_key: &["vendor_id", "region_id", "zone_id", "server_id", "allocation"],
        foreign_keys: &[
            ForeignKey {
                name: "fk_server_price_region_id_region",
                columns: &["vendor_id", "region_id"],
                referenced_table: "region",
                referenced_columns: &["vendor_id", "region_id"],
            },
            ForeignKey {
                name: "fk_server_price_zone_id_zone",
                columns: &["vendor_id", "region_id", "zone_id"],
                referenced_table: "zone",
                referenced_columns: &["vendor_id", "region_id", "zone_id"],
            },
            ForeignKey {
                name: "fk_server_price_server_id_server",
                columns: &["vendor_id", "server_id"],
                referenced_table: "server",
                referenced_columns: &["vendor_id", "server_id"],
            },
        ],
        has_scd: true,
    },
    TableSchema {
        name: "storage_price",
        columns: STORAGE_PRICE_COLUMNS,
        primary_key: &["vendor_id", "region_id", "storage_id"],
        foreign_keys: &[
            ForeignKey {
                name: "fk_storage_price_region_id_region",
                columns: &["vendor_id", "region_id"],
                referenced_table: "region",
                referenced_columns: &["vendor_id", "region_id"],
            },
            ForeignKey {
                name: "fk_storage_price_storage_id_storage",
                columns: &["vendor_id", "storage_id"],
                referenced_table: "storage",
                referenced_columns: &["vendor_id", "storage_id"],
            },
        ],
        has_scd: true,
    },
    TableSchema {
        name: "traffic_price",
        columns: TRAFFIC_PRICE_COLUMNS,
        primary_key: &["vendor_id", "region_id", "direction"],
        foreign_keys: &[ForeignKey {
            name: "fk_traffic_price_region_id_region",
            columns: &["vendor_id", "region_id"],
            referenced_table: "region",
            referenced_columns: &["vendor_id", "region_id"],
        }],
        has_scd: true,
    },
    TableSchema {
        name: "ipv4_price",
        columns: IPV4_PRICE_COLUMNS,
        primary_key: &["vendor_id", "region_id"],
        foreign_keys: &[ForeignKey {
            name: "fk_ipv4_price_region_id_region",
            columns: &["vendor_id", "region_id"],
            referenced_table: "region",
            referenced_columns: &["vendor_id", "region_id"],
        }],
        has_scd: true,
    },
    TableSchema {
        name: "benchmark",
        columns: BENCHMARK_COLUMNS,
        primary_key: &["benchmark_id"],
        foreign_keys: &[],
        has_scd: false,
    },
    TableSchema {
        name: "benchmark_score",
        columns: BENCHMARK_SCORE_COLUMNS,
        primary_key: &["vendor_id", "server_id", "benchmark_id", "config"],
        foreign_keys: &[
            ForeignKey {
                name: "fk_benchmark_score_vendor_id_vendor",
                columns: &["vendor_id"],
                referenced_table: "vendor",
                referenced_columns: &["vendor_id"],
            },
            ForeignKey {
                name: "fk_benchmark_score_server_id_server",
                columns: &["vendor_id", "server_id"],
                referenced_table: "server",
                referenced_columns: &["vendor_id", "server_id"],
            },
            ForeignKey {
                name: "fk_benchmark_score_benchmark_id_benchmark",
                columns: &["benchmark_id"],
                referenced_table: "benchmark",
                referenced_columns: &["benchmark_id"],
            },
        ],
        has_scd: false,
    },
];

pub fn table(name: &str) -> Option<&'static TableSchema> {
    TABLES.iter().find(|t| t.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_foreign_key_references_a_known_table() {
        for t in TABLES {
            for fk in t.foreign_keys {
                assert!(table(fk.referenced_table).is_some(), "unknown FK target {}", fk.referenced_table);
            }
        }
    }

    #[test]
    fn fk_and_pk_names_follow_the_naming_convention() {
        for t in TABLES {
            for fk in t.foreign_keys {
                assert!(fk.name.starts_with(&format!("fk_{}_", t.name)));
            }
        }
    }
}
