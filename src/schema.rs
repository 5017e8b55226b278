//! Fixed layout of the inventory export and of the destination sheet.

/// Sheet that receives the filtered rows.
pub const SHEET_NAME: &str = "Bestandsabgleichfiltered";

/// Sheet holding the "Last Run" cell.
pub const TIMESTAMP_SHEET: &str = "test";

/// Rows per CSV chunk.
pub const CHUNK_ROWS: usize = 200_000;

/// Rows per append call.
pub const BATCH_ROWS: usize = 2_000;

/// Width of a published row (columns A..V).
pub const OUTPUT_WIDTH: usize = 22;

/// 0-based index of Excel column AC, dropped when the export carries it.
pub const EXTRANEOUS_COLUMN: usize = 28;

/// Full header list of the export. Only the first [`OUTPUT_WIDTH`] are written.
pub const HEADERS: [&str; 28] = [
    "MainLhm",
    "MainLhmdef",
    "Lager",
    "RegalStpl",
    "Ziel",
    "DistChannel",
    "SubLhm",
    "SubLhmdef",
    "Category",
    "Sortierziel ID",
    "SortKriterium",
    "sapcommoditygroupid",
    "Consumables",
    "Referenznummer",
    "Artikelnummer",
    "SKU",
    "BRANDCODE",
    "Qualität",
    "Source",
    "Anzahl",
    "Status",
    "Einlagerung",
    "Gewicht mainLhm",
    "Gewicht sublhm",
    "OVAPTypInfo",
    "Gemeldet",
    "SORTINGCRITERIAIDLHM",
    "SAPCOMMODITYGROUPIDLHM",
];

/// Columns G, J, O and T hold counts and are written as integers.
pub const NUMERIC_COLUMNS: [usize; 4] = [6, 9, 14, 19];

/// Header names the filter reads from the raw export.
pub const WAREHOUSE_COLUMN: &str = "lager";
pub const CATEGORY_COLUMN: &str = "category";
pub const SORT_CRITERION_COLUMN: &str = "sortkriterium";

/// Warehouses whose stock is published.
pub const KEEP_WAREHOUSES: [&str; 2] = ["BGL", "SZROV"];

/// Sort criteria that count as beauty stock even when the category says otherwise.
pub const KEEP_SORT_CRITERIA: [&str; 13] = [
    "DamenAccessoiresBeautyNOS",
    "DamenAccessoiresBeautyFS",
    "DamenBeautySetsNOS",
    "DamenBeautyDekorative KosmetikNOS",
    "DamenAccessoiresBeautyHW",
    "DamenBeautyPflegeNOS",
    "StandardWomenBeautyMake-UpMake-UpNOS",
    "StandardMenBeautySkin & Hair CareSkin & Hair CareNOS",
    "StandardMenBeautyAccessoiresAccessoiresNOS",
    "StandardWomenBeautyAccessoiresAccessoiresNOS",
    "StandardWomenBeautySkin & Hair CareSkin & Hair CareNOS",
    "BeautyBeautyBeauty MixNOS",
    "BeautyBeautyBeauty Mix SpecialNOS",
];

/// Header row written to `A1:V1`.
pub fn output_headers() -> &'static [&'static str] {
    &HEADERS[..OUTPUT_WIDTH]
}

pub fn is_numeric_column(idx: usize) -> bool {
    NUMERIC_COLUMNS.contains(&idx)
}
