//! Horse-master layout (UKC, 馬基本データ)

use chrono::{DateTime, Utc};

use super::require_length;
use crate::app::models::{Layout, PedigreeRecord};
use crate::app::services::jrdb_parser::code_tables;
use crate::app::services::jrdb_parser::field_parsers::{FixedWidthLine, Span};
use crate::error::DecodeError;

pub const HORSE_ID: Span = Span::new(0, 8);
pub const HORSE_NAME: Span = Span::new(8, 44);
pub const SEX_CODE: Span = Span::new(44, 45);
pub const COAT_COLOR_CODE: Span = Span::new(45, 47);
pub const HORSE_SYMBOL_CODE: Span = Span::new(47, 49);
pub const SIRE_NAME: Span = Span::new(49, 85);
pub const DAM_NAME: Span = Span::new(85, 121);
pub const DAM_SIRE_NAME: Span = Span::new(121, 157);
pub const BIRTH_DATE: Span = Span::new(157, 165);
pub const OWNER_NAME: Span = Span::new(177, 217);
pub const BREEDER_NAME: Span = Span::new(219, 259);
pub const BIRTHPLACE: Span = Span::new(259, 267);
pub const RETIRED_FLAG: Span = Span::new(267, 268);
pub const DATA_DATE: Span = Span::new(268, 276);
pub const SIRE_LINEAGE_CODE: Span = Span::new(276, 280);
pub const DAM_SIRE_LINEAGE_CODE: Span = Span::new(280, 284);

pub fn decode(text: &str, now: DateTime<Utc>) -> Result<PedigreeRecord, DecodeError> {
    let line = FixedWidthLine::new(text);
    require_length(Layout::HorseMaster, &line)?;

    let sex_code = line.string(SEX_CODE);

    Ok(PedigreeRecord {
        horse_id: line.string(HORSE_ID),
        horse_name: line.name(HORSE_NAME),
        sex: code_tables::sex(&sex_code),
        sex_code,
        coat_color_code: line.string(COAT_COLOR_CODE),
        horse_symbol_code: line.string(HORSE_SYMBOL_CODE),
        sire_name: line.name(SIRE_NAME),
        dam_name: line.name(DAM_NAME),
        dam_sire_name: line.name(DAM_SIRE_NAME),
        birth_date: line.date(BIRTH_DATE),
        owner_name: line.name(OWNER_NAME),
        breeder_name: line.name(BREEDER_NAME),
        birthplace: line.name(BIRTHPLACE),
        retired_flag: line.int(RETIRED_FLAG),
        data_date: line.date(DATA_DATE),
        sire_lineage_code: line.string(SIRE_LINEAGE_CODE),
        dam_sire_lineage_code: line.string(DAM_SIRE_LINEAGE_CODE),
        created_at: now,
        updated_at: now,
    })
}
