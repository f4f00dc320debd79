//! Allow-list of World Bank indicator codes accepted for import.
//!
//! # Invariants
//! - The set is built once per process and never mutated.
//! - Membership is an exact, case-sensitive match.

use once_cell::sync::Lazy;
use std::collections::BTreeSet;

const INDICATOR_CODES: &[&str] = &[
    "TX.VAL.AGRI.ZS.UN",
    "TM.VAL.AGRI.ZS.UN",
    "SP.RUR.TOTL.ZS",
    "SP.RUR.TOTL.ZG",
    "SP.RUR.TOTL",
    "SL.AGR.EMPL.ZS",
    "SL.AGR.EMPL.MA.ZS",
    "SL.AGR.EMPL.FE.ZS",
    "SI.POV.RUHC",
    "SI.POV.RUGP",
    "NV.AGR.TOTL.ZS",
    "NV.AGR.TOTL.CD",
    "ER.H2O.FWAG.ZS",
    "EN.POP.EL5M.RU.ZS",
    "EN.ATM.NOXE.AG.ZS",
    "EN.ATM.NOXE.AG.KT.CE",
    "EN.ATM.METH.AG.ZS",
    "EN.ATM.METH.AG.KT.CE",
    "EG.ELC.ACCS.RU.ZS",
    "AG.YLD.CREL.KG",
    "AG.SRF.TOTL.K2",
    "AG.PRD.LVSK.XD",
    "AG.PRD.FOOD.XD",
    "AG.PRD.CROP.XD",
    "AG.PRD.CREL.MT",
    "AG.LND.TRAC.ZS",
    "AG.LND.TOTL.RU.K2",
    "AG.LND.TOTL.K2",
    "AG.LND.PRCP.MM",
    "AG.LND.IRIG.AG.ZS",
    "AG.LND.FRST.ZS",
    "AG.LND.FRST.K2",
    "AG.LND.EL5M.RU.ZS",
    "AG.LND.EL5M.RU.K2",
    "AG.LND.CROP.ZS",
    "AG.LND.CREL.HA",
    "AG.LND.ARBL.ZS",
    "AG.LND.ARBL.HA.PC",
    "AG.LND.ARBL.HA",
    "AG.LND.AGRI.ZS",
    "AG.LND.AGRI.K2",
    "AG.CON.FERT.ZS",
    "AG.CON.FERT.PT.ZS",
    "AG.AGR.TRAC.NO",
    "NY.GDP.MKTP.CD",
];

static CATALOG: Lazy<BTreeSet<&'static str>> =
    Lazy::new(|| INDICATOR_CODES.iter().copied().collect());

/// Returns whether `code` is an importable indicator.
pub fn is_valid(code: &str) -> bool {
    CATALOG.contains(code)
}

/// Returns all importable indicator codes in sorted order.
pub fn codes() -> impl Iterator<Item = &'static str> {
    CATALOG.iter().copied()
}
