//! Acquisition-directory classification.
//!
//! Maps the free-text protocol folder names found in ADNI exports onto a BIDS
//! category (`anat`, `func`, ...) and a filename suffix (`T1w`, `dir-PA_dwi`, ...).
//! Exact hits come from a static table; unknown names fall back to a
//! case-insensitive substring scan where the first table entry that matches wins.
//!
//! The scan order is the table order as written below. Reordering entries changes
//! the result for ambiguous names, so new rows should be appended to their block.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// BIDS datatype directory an acquisition is written into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Anat,
    Func,
    Dwi,
    Fmap,
    Perf,
    /// Unrecognized acquisitions, kept for manual curation.
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Anat => "anat",
            Category::Func => "func",
            Category::Dwi => "dwi",
            Category::Fmap => "fmap",
            Category::Perf => "perf",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Right-hand side of the primary table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Include(Category),
    Exclude,
}

use Category::*;
use Target::{Exclude, Include};

/// Primary table: acquisition directory name to category, in scan order.
const CATEGORY_TABLE: &[(&str, Target)] = &[
    // anat: T1w variants
    ("MPRAGE", Include(Anat)),
    ("MP-RAGE", Include(Anat)),
    ("Accelerated_Sagittal_MPRAGE", Include(Anat)),
    ("Accelerated_Sagittal_MPRAGE__MSV21_", Include(Anat)),
    ("Accelerated_Sagittal_MPRAGE__MSV22_", Include(Anat)),
    ("Accelerated_Sagittal_MPRAGE_ND", Include(Anat)),
    ("Sagittal_3D_Accelerated_MPRAGE", Include(Anat)),
    ("MPRAGE_GRAPPA2", Include(Anat)),
    ("MPRAGE_SENSE2", Include(Anat)),
    ("Accelerated_Sag_IR-FSPGR", Include(Anat)),
    ("Accelerated_Sagittal_IR-FSPGR", Include(Anat)),
    ("Sag_IR-FSPGR", Include(Anat)),
    ("Sag_IR-SPGR", Include(Anat)),
    ("Accelerated_Sag_IR-SPGR", Include(Anat)),
    ("MP-RAGE_REPEAT", Include(Anat)),
    ("IR-FSPGR-Repeat", Include(Anat)),
    ("REPEAT_SAG_3D_MP_RAGE", Include(Anat)),
    ("REPEAT_SAG_3D_MP_RAGE_NO_ANGLE", Include(Anat)),
    ("MP_RAGE_SAGITTAL_REPEAT", Include(Anat)),
    ("MP_RAGE_SAGITTAL", Include(Anat)),
    ("SAG_MPRAGE_NO_ANGLE", Include(Anat)),
    ("SAG_MPRAGE_GRAPPA2_NO_ANGLE", Include(Anat)),
    ("SAG_3D_MPRAGE", Include(Anat)),
    ("SAG_3D_MPRAGE_NO_ANGLE", Include(Anat)),
    ("IR-SPGR", Include(Anat)),
    ("IR-SPGR_w_acceleration", Include(Anat)),
    ("IR-FSPGR", Include(Anat)),
    ("IR-FSPGR__replaces_MP-Rage_", Include(Anat)),
    ("MP-RAGE-Repeat", Include(Anat)),
    ("MPRAGE_Repeat", Include(Anat)),
    ("MP-RAGE-REPEAT", Include(Anat)),
    ("MPRAGE_repeat", Include(Anat)),
    ("CS_Sagittal_MPRAGE__MSV22_", Include(Anat)),
    ("Accelerated_Sagittal_MPRAGE_REPEAT", Include(Anat)),
    ("Accelerated_Sagittal_MPRAGE_repeat", Include(Anat)),
    ("Accelerated_Sagittal_MPRAGE_MSV21", Include(Anat)),
    ("Sagittal_3D_Accelerated_MPRAGE__MSV21_", Include(Anat)),
    ("Sagittal_3D_Accelerated_MPRAGE_REPEAT", Include(Anat)),
    ("Accelerated_Sagittal_MPRAGE_MPR_Cor", Include(Anat)),
    ("Accelerated_Sagittal_MPRAGE_MPR_Tra", Include(Anat)),
    ("REPEAT_SAG_3D_MPRAGE", Include(Anat)),
    ("Accelerated_SAG_IR-SPGR", Include(Anat)),
    ("Sag_IR-SPGR-REPEAT", Include(Anat)),
    ("HS_Sagittal_MPRAGE__MSV22_", Include(Anat)),
    ("MPRAGE_S2_DIS2D", Include(Anat)),
    ("3D_T1_SAG", Include(Anat)),
    ("3D_MPRAGE", Include(Anat)),
    ("VWIP_Coronal_3D_Accelerated_MPRAGE", Include(Anat)),
    // anat: T2w / FLAIR variants
    ("Sagittal_3D_FLAIR", Include(Anat)),
    ("Sagittal_3D_FLAIR__MSV22_", Include(Anat)),
    ("Sagittal_3D_FLAIR__MSV23_", Include(Anat)),
    ("Axial_FLAIR", Include(Anat)),
    ("Sagittal_3D_T2_SPACE__MSV21_", Include(Anat)),
    ("Sagittal_3D_T2_Vista__MSV21_", Include(Anat)),
    ("CS_Sagittal_3D_T2_Vista__MSV24_", Include(Anat)),
    ("Sagittal_3D_T2_SPACE_MSV21", Include(Anat)),
    ("AXIAL_FLAIR", Include(Anat)),
    ("FLAIR", Include(Anat)),
    ("t2_flair_SAG", Include(Anat)),
    ("Sagittal_3D_FLAIR_MSV33", Include(Anat)),
    ("Sagittal_3D_FLAIR_MPR_Cor", Include(Anat)),
    ("Sagittal_3D_FLAIR_MPR_Tra", Include(Anat)),
    ("CS_Sagittal_3D_FLAIR__MSV24_", Include(Anat)),
    ("Sagittal_3D_FLAIR__MSV23__RPT", Include(Anat)),
    ("Sagittal_3D_FLAIR_Repeat", Include(Anat)),
    ("Axial_3D_FLAIR", Include(Anat)),
    // func
    ("Axial_rsfMRI__Eyes_Open_", Include(Func)),
    ("Axial_rsfMRI__EYES_OPEN_", Include(Func)),
    ("Axial_fcMRI__EYES_OPEN_", Include(Func)),
    ("Axial_fcMRI__Eyes_Open_", Include(Func)),
    ("Axial_MB_rsfMRI__Eyes_Open_", Include(Func)),
    ("Axial_HB_rsfMRI__Eyes_Open___MSV22_", Include(Func)),
    ("Axial_HB_rsfMRI__Eyes_Open_", Include(Func)),
    ("Resting_State_fMRI", Include(Func)),
    ("Extended_Resting_State_fMRI", Include(Func)),
    ("Axial_fcMRI", Include(Func)),
    ("Axial_MB_rsfMRI__EYES_OPEN___MSV22_", Include(Func)),
    ("Axial_rsfMRI__Eyes_Open__MSV21_", Include(Func)),
    ("Axial_rsfMRI__Eyes_Open___MSV21", Include(Func)),
    ("Axial_rsfMRI__Eyes_Open___MSV21_", Include(Func)),
    ("Axial_fcMRI__EYES_OPEN__REPEAT", Include(Func)),
    ("AXIAL_RS_fMRI__EYES_OPEN_", Include(Func)),
    ("Axial_MB_rsfMRI_AP", Include(Func)),
    ("Extended_AXIAL_rsfMRI_EYES_OPEN", Include(Func)),
    ("Axial_RESTING_fcMRI__EYES_OPEN_", Include(Func)),
    ("Axial_-_Advanced_fMRI_64_Channel", Include(Func)),
    ("epi_2s_resting_state", Include(Func)),
    // dwi
    ("Axial_MB_DTI_PA__MSV21_", Include(Dwi)),
    ("Axial_MB_DTI_AP__MSV21_", Include(Dwi)),
    ("Axial_HB_dMRI__MS21_", Include(Dwi)),
    ("Axial_MB_dMRI_PA__MSV21_", Include(Dwi)),
    ("Axial_MB_dMRI_AP__MSV21_", Include(Dwi)),
    ("Axial_DTI", Include(Dwi)),
    ("Axial_DTI__MSV21_", Include(Dwi)),
    ("Axial_MB_dMRI_A__P__MSV21_", Include(Dwi)),
    ("Axial_MB_dMRI_P__A__MSV21_", Include(Dwi)),
    ("Axial_dMRI__MSV21_", Include(Dwi)),
    ("Axial_MB_DTI", Include(Dwi)),
    ("Axial_DTI__MSV20_", Include(Dwi)),
    ("Axial_DTI_MSV21", Include(Dwi)),
    // fmap
    ("Axial_Field_Mapping", Include(Fmap)),
    ("Field_Mapping", Include(Fmap)),
    ("WIP_Field_Mapping", Include(Fmap)),
    ("Field_Mapping_REPEAT", Include(Fmap)),
    ("Field_Mapping_repeat", Include(Fmap)),
    // perf
    ("Perfusion_Weighted", Include(Perf)),
    ("ASL_Perfusion", Include(Perf)),
    ("Axial_2D_PASL", Include(Perf)),
    ("Axial_3D_PASL", Include(Perf)),
    ("SOURCE_-_Axial_2D_PASL", Include(Perf)),
    ("Axial_3D_PASL__Eyes_Open_", Include(Perf)),
    ("WIP_SOURCE_-_Axial_3D_pCASL__Eyes_Open_", Include(Perf)),
    // scouts, calibration and scanner-derived series
    ("AAHead_Scout", Exclude),
    ("AAHead_Scout_MPR_sag", Exclude),
    ("AAHead_Scout_MPR_cor", Exclude),
    ("AAHead_Scout_MPR_tra", Exclude),
    ("Calibration_Scan", Exclude),
    ("relCBF", Exclude),
    ("MoCoSeries", Exclude),
    ("Cal_8HRBRAIN", Exclude),
    ("B1-Calibration_PA", Exclude),
    ("B1-Calibration_Body", Exclude),
    ("B1-calibration_Body", Exclude),
    ("B1-calibration_Head", Exclude),
    ("SAG_B1_CALIBRATION_BODY", Exclude),
    ("SAG_B1_CALIBRATION_HEAD", Exclude),
    ("SAG_B1_CALIBRATION_BODY_REPEAT", Exclude),
    ("repeat_SAG_B1_CALIBRATION_BODY", Exclude),
    ("Cal_Head_24", Exclude),
    ("ASSET_Cal", Exclude),
    ("Axial_MB_DTI_TENSOR_B0", Exclude),
    ("Axial_MB_DTI_FA", Exclude),
    ("Axial_MB_DTI_ADC", Exclude),
    ("Axial_MB_DTI_TRACEW", Exclude),
    ("Axial_T2_Star-Repeated_with_exact_copy_of_FLAIR", Exclude),
    ("CORONAL", Exclude),
    ("Cal_RM_8HRBRAIN", Exclude),
    ("AXIAL_RFORMAT_1", Exclude),
    ("AAHead_Scout_64ch-head-coil", Exclude),
    ("AAHead_Scout_64ch-head-coil_MPR_sag", Exclude),
    ("B1-Calibration", Exclude),
    ("Cal_Head+Neck_40", Exclude),
    ("act_te_=_6000_B1-Calibration_Body", Exclude),
    ("act_te_=_6000_B1-Calibration_PA", Exclude),
    ("Localizer", Exclude),
    ("Localizer_MPR_sag", Exclude),
];

/// Key used in a suffix table for the category-wide fallback.
pub const DEFAULT_KEY: &str = "default";
/// Suffix reported when nothing better is known.
pub const UNKNOWN_SUFFIX: &str = "unknown";

const ANAT_SUFFIXES: &[(&str, &str)] = &[
    ("MPRAGE", "T1w"),
    ("MP-RAGE", "T1w"),
    ("Accelerated_Sagittal_MPRAGE", "T1w"),
    ("Accelerated_Sagittal_MPRAGE__MSV21_", "T1w"),
    ("Accelerated_Sagittal_MPRAGE__MSV22_", "T1w"),
    ("Accelerated_Sagittal_MPRAGE_ND", "T1w"),
    ("Sagittal_3D_Accelerated_MPRAGE", "T1w"),
    ("MPRAGE_GRAPPA2", "T1w"),
    ("MPRAGE_SENSE2", "T1w"),
    ("Accelerated_Sag_IR-FSPGR", "T1w"),
    ("Accelerated_Sagittal_IR-FSPGR", "T1w"),
    ("Sag_IR-FSPGR", "T1w"),
    ("Sag_IR-SPGR", "T1w"),
    ("Accelerated_Sag_IR-SPGR", "T1w"),
    ("MP-RAGE_REPEAT", "T1w"),
    ("IR-FSPGR-Repeat", "T1w"),
    ("IR-FSPGR", "T1w"),
    ("IR-SPGR", "T1w"),
    ("Sagittal_3D_FLAIR", "FLAIR"),
    ("Sagittal_3D_FLAIR__MSV22_", "FLAIR"),
    ("Sagittal_3D_FLAIR__MSV23_", "FLAIR"),
    ("Axial_FLAIR", "FLAIR"),
    ("AXIAL_FLAIR", "FLAIR"),
    ("FLAIR", "FLAIR"),
    ("t2_flair_SAG", "FLAIR"),
    ("Axial_3D_FLAIR", "FLAIR"),
    ("Sagittal_3D_T2_SPACE__MSV21_", "T2w"),
    ("Sagittal_3D_T2_Vista__MSV21_", "T2w"),
    ("CS_Sagittal_3D_T2_Vista__MSV24_", "T2w"),
    ("Sagittal_3D_T2_SPACE_MSV21", "T2w"),
    (DEFAULT_KEY, "T1w"),
];

const FUNC_SUFFIXES: &[(&str, &str)] = &[(DEFAULT_KEY, "task-rest_bold")];

const DWI_SUFFIXES: &[(&str, &str)] = &[
    ("Axial_MB_DTI_PA__MSV21_", "dir-PA_dwi"),
    ("Axial_MB_DTI_AP__MSV21_", "dir-AP_dwi"),
    ("Axial_MB_dMRI_PA__MSV21_", "dir-PA_dwi"),
    ("Axial_MB_dMRI_AP__MSV21_", "dir-AP_dwi"),
    ("Axial_MB_dMRI_A__P__MSV21_", "dir-AP_dwi"),
    ("Axial_MB_dMRI_P__A__MSV21_", "dir-PA_dwi"),
    (DEFAULT_KEY, "dwi"),
];

const FMAP_SUFFIXES: &[(&str, &str)] = &[(DEFAULT_KEY, "fieldmap")];

const PERF_SUFFIXES: &[(&str, &str)] = &[(DEFAULT_KEY, "asl")];

const SUFFIX_TABLES: &[(Category, &[(&str, &str)])] = &[
    (Anat, ANAT_SUFFIXES),
    (Func, FUNC_SUFFIXES),
    (Dwi, DWI_SUFFIXES),
    (Fmap, FMAP_SUFFIXES),
    (Perf, PERF_SUFFIXES),
];

/// How a category was found for a directory name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    /// Substring fallback, carrying the table key that matched first.
    Substring(&'static str),
    /// Nothing matched; category is `other`.
    Unmatched,
}

/// Advisory signal raised during classification. Never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    UnknownAcquisition(String),
    MissingSuffix { name: String, category: Category },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::UnknownAcquisition(name) => {
                write!(f, "Unknown acquisition directory: {}, defaulting to 'other'", name)
            }
            Advisory::MissingSuffix { name, category } => {
                write!(f, "No suffix mapping for {} in {}", name, category)
            }
        }
    }
}

/// Result of classifying one acquisition directory name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Dropped entirely: no output, no error.
    Excluded,
    Included {
        category: Category,
        suffix: &'static str,
        matched: MatchKind,
        advisory: Option<Advisory>,
    },
}

impl Classification {
    /// `(category, suffix)` pair, `None` when excluded.
    pub fn target(&self) -> Option<(Category, &'static str)> {
        match self {
            Classification::Excluded => None,
            Classification::Included {
                category, suffix, ..
            } => Some((*category, *suffix)),
        }
    }

    pub fn advisory(&self) -> Option<&Advisory> {
        match self {
            Classification::Excluded => None,
            Classification::Included { advisory, .. } => advisory.as_ref(),
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(
            self,
            Classification::Included {
                matched: MatchKind::Unmatched,
                ..
            }
        )
    }
}

/// Read-only classification tables, built once per process.
pub struct CategoryMapping {
    ordered: &'static [(&'static str, Target)],
    exact: HashMap<&'static str, Target>,
    suffixes: HashMap<Category, HashMap<&'static str, &'static str>>,
}

impl CategoryMapping {
    /// The built-in ADNI table.
    pub fn builtin() -> &'static CategoryMapping {
        static MAPPING: OnceLock<CategoryMapping> = OnceLock::new();
        MAPPING.get_or_init(|| CategoryMapping::from_tables(CATEGORY_TABLE, SUFFIX_TABLES))
    }

    fn from_tables(
        ordered: &'static [(&'static str, Target)],
        suffix_tables: &'static [(Category, &'static [(&'static str, &'static str)])],
    ) -> Self {
        let mut exact = HashMap::with_capacity(ordered.len());
        for (name, target) in ordered {
            // first row wins if a name is ever listed twice
            exact.entry(*name).or_insert(*target);
        }
        let suffixes = suffix_tables
            .iter()
            .map(|(category, rows)| (*category, rows.iter().copied().collect()))
            .collect();
        Self {
            ordered,
            exact,
            suffixes,
        }
    }

    /// Classify an acquisition directory name.
    ///
    /// Exact lookup first; otherwise the first non-excluded table key that contains,
    /// or is contained in, the upper-cased name decides the category. The suffix is
    /// always looked up with the original name, falling back to the category default.
    pub fn classify(&self, name: &str) -> Classification {
        let (category, matched) = match self.exact.get(name) {
            Some(Target::Exclude) => return Classification::Excluded,
            Some(Target::Include(category)) => (*category, MatchKind::Exact),
            None => match self.substring_match(name) {
                Some((key, category)) => (category, MatchKind::Substring(key)),
                None => {
                    return Classification::Included {
                        category: Category::Other,
                        suffix: UNKNOWN_SUFFIX,
                        matched: MatchKind::Unmatched,
                        advisory: Some(Advisory::UnknownAcquisition(name.to_string())),
                    }
                }
            },
        };

        let (suffix, advisory) = match self.suffix_for(category, name) {
            Some(suffix) => (suffix, None),
            None => (
                UNKNOWN_SUFFIX,
                Some(Advisory::MissingSuffix {
                    name: name.to_string(),
                    category,
                }),
            ),
        };

        Classification::Included {
            category,
            suffix,
            matched,
            advisory,
        }
    }

    fn substring_match(&self, name: &str) -> Option<(&'static str, Category)> {
        let upper = name.to_uppercase();
        self.ordered.iter().find_map(|(key, target)| match target {
            Target::Exclude => None,
            Target::Include(category) => {
                let key_upper = key.to_uppercase();
                if upper.contains(&key_upper) || key_upper.contains(&upper) {
                    Some((*key, *category))
                } else {
                    None
                }
            }
        })
    }

    fn suffix_for(&self, category: Category, name: &str) -> Option<&'static str> {
        let table = self.suffixes.get(&category)?;
        table
            .get(name)
            .or_else(|| table.get(DEFAULT_KEY))
            .copied()
    }

    /// Every suffix the tables can produce, in first-seen order.
    pub fn known_suffixes(&self) -> Vec<&'static str> {
        let mut seen = Vec::new();
        for (_, rows) in SUFFIX_TABLES {
            for (_, suffix) in rows.iter() {
                if !seen.contains(suffix) {
                    seen.push(*suffix);
                }
            }
        }
        seen
    }

    /// Secondary-table keys whose primary entry disagrees on the category.
    pub fn contradictions(&self) -> Vec<(Category, &'static str)> {
        let mut bad = Vec::new();
        for (category, rows) in SUFFIX_TABLES {
            for (key, _) in rows.iter() {
                if *key == DEFAULT_KEY {
                    continue;
                }
                if self.exact.get(key) != Some(&Target::Include(*category)) {
                    bad.push((*category, *key));
                }
            }
        }
        bad
    }
}

/// Classify with the built-in table.
pub fn classify(name: &str) -> Classification {
    CategoryMapping::builtin().classify(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(name: &str) -> Option<(Category, &'static str)> {
        classify(name).target()
    }

    #[test]
    fn test_every_table_key_is_exact_and_stable() {
        for (name, target) in CATEGORY_TABLE {
            let first = classify(name);
            let second = classify(name);
            assert_eq!(first, second, "{} is not deterministic", name);
            match target {
                Target::Exclude => assert_eq!(first, Classification::Excluded),
                Target::Include(category) => match first {
                    Classification::Included {
                        category: got,
                        matched,
                        ..
                    } => {
                        assert_eq!(got, *category, "{}", name);
                        assert_eq!(matched, MatchKind::Exact, "{}", name);
                    }
                    Classification::Excluded => panic!("{} unexpectedly excluded", name),
                },
            }
        }
    }

    #[test]
    fn test_suffix_tables_agree_with_primary_table() {
        assert!(CategoryMapping::builtin().contradictions().is_empty());
    }

    #[test]
    fn test_mprage_is_t1w() {
        assert_eq!(pair("MPRAGE"), Some((Category::Anat, "T1w")));
    }

    #[test]
    fn test_dwi_direction_is_exact_not_fallback() {
        let result = classify("Axial_MB_DTI_PA__MSV21_");
        assert_eq!(result.target(), Some((Category::Dwi, "dir-PA_dwi")));
        assert!(matches!(
            result,
            Classification::Included {
                matched: MatchKind::Exact,
                advisory: None,
                ..
            }
        ));
    }

    #[test]
    fn test_scout_is_excluded() {
        assert_eq!(classify("AAHead_Scout"), Classification::Excluded);
        assert_eq!(pair("AAHead_Scout"), None);
    }

    #[test]
    fn test_novel_name_is_other_with_advisory() {
        let result = classify("Some_Totally_Novel_Sequence_2024");
        assert_eq!(result.target(), Some((Category::Other, "unknown")));
        assert!(!result.is_recognized());
        assert_eq!(
            result.advisory(),
            Some(&Advisory::UnknownAcquisition(
                "Some_Totally_Novel_Sequence_2024".to_string()
            ))
        );
    }

    #[test]
    fn test_substring_fallback_uses_category_default_suffix() {
        let result = classify("mprage_repeat_2");
        assert_eq!(result.target(), Some((Category::Anat, "T1w")));
        assert!(matches!(
            result,
            Classification::Included {
                matched: MatchKind::Substring("MPRAGE"),
                ..
            }
        ));
    }

    #[test]
    fn test_substring_fallback_is_first_hit_not_longest() {
        // "FLAIR" (anat) precedes the longer "Axial_DTI" (dwi) in the table.
        let result = classify("Axial_DTI_and_FLAIR");
        assert_eq!(result.target(), Some((Category::Anat, "T1w")));
        assert!(matches!(
            result,
            Classification::Included {
                matched: MatchKind::Substring("FLAIR"),
                ..
            }
        ));
    }

    #[test]
    fn test_substring_fallback_matches_when_name_is_inside_key() {
        let result = classify("field");
        assert_eq!(result.target(), Some((Category::Fmap, "fieldmap")));
    }

    #[test]
    fn test_substring_fallback_never_hits_excluded_keys() {
        for name in ["AAHead_Scout_v2", "Localizer_3plane", "relCBF_map"] {
            let result = classify(name);
            assert_ne!(result, Classification::Excluded, "{}", name);
            if let Classification::Included { matched, .. } = result {
                if let MatchKind::Substring(key) = matched {
                    let target = CATEGORY_TABLE
                        .iter()
                        .find(|(k, _)| *k == key)
                        .map(|(_, t)| *t);
                    assert_ne!(target, Some(Target::Exclude), "{} matched {}", name, key);
                }
            }
        }
        assert_eq!(pair("AAHead_Scout_v2"), Some((Category::Other, "unknown")));
    }

    #[test]
    fn test_known_suffixes_cover_all_categories() {
        let suffixes = CategoryMapping::builtin().known_suffixes();
        for expected in ["T1w", "FLAIR", "T2w", "task-rest_bold", "dir-PA_dwi", "dwi", "fieldmap", "asl"] {
            assert!(suffixes.contains(&expected), "{}", expected);
        }
    }
}
