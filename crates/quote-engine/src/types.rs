use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),
}

pub type Result<T> = std::result::Result<T, QuoteError>;

/// How the useful sheet is derived from the base sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CutMode {
    /// Base sheet goes to press uncut
    #[default]
    None,
    /// Base sheet split into 2, 3 or 4 equal strips
    Fraction,
    /// Caller supplies the useful sheet size
    Custom,
}

/// Standard cut-down fractions of a base sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CutFraction {
    #[default]
    Half,
    Third,
    Quarter,
}

impl CutFraction {
    /// Parse "1/2", "1/3" or "1/4"; anything else is `None`
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().replace(' ', "").as_str() {
            "1/2" => Some(CutFraction::Half),
            "1/3" => Some(CutFraction::Third),
            "1/4" => Some(CutFraction::Quarter),
            _ => None,
        }
    }

    /// Useful sheets obtained from one base sheet
    pub fn pieces(self) -> u32 {
        match self {
            CutFraction::Half => 2,
            CutFraction::Third => 3,
            CutFraction::Quarter => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CutFraction::Half => "1/2",
            CutFraction::Third => "1/3",
            CutFraction::Quarter => "1/4",
        }
    }
}

/// Ink counts per face, written "F/B" (e.g. "4/0", "4/4")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Colors {
    pub front: u32,
    pub back: u32,
}

impl Colors {
    pub fn new(front: u32, back: u32) -> Self {
        Self { front, back }
    }

    /// Lenient parse: malformed or negative parts count as 0, a lone
    /// number is the front count.
    pub fn parse(value: &str) -> Self {
        let mut parts = value.split('/');
        let front = parts.next().map(parse_ink_count).unwrap_or(0);
        let back = parts.next().map(parse_ink_count).unwrap_or(0);
        Self { front, back }
    }

    /// Printing plates: one per ink per face
    pub fn plates(&self) -> u32 {
        self.front.saturating_add(self.back)
    }

    /// Inks on the busier face
    pub fn active_faces(&self) -> u32 {
        self.front.max(self.back)
    }
}

impl std::fmt::Display for Colors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.front, self.back)
    }
}

fn parse_ink_count(part: &str) -> u32 {
    part.trim()
        .parse::<i64>()
        .map(|n| n.clamp(0, u32::MAX as i64) as u32)
        .unwrap_or(0)
}

/// Resolved sheet geometry for one calculation
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SheetContext {
    /// Stock sheet as purchased (width, height)
    pub base_sheet_mm: (f64, f64),
    pub use_cut_sheet: bool,
    pub cut_mode: CutMode,
    pub cut_fraction: Option<CutFraction>,
    /// Sheet fed through the press; equals the base sheet when uncut
    pub useful_sheet_mm: (f64, f64),
    /// Useful sheets obtained from one base sheet (always >= 1)
    pub pieces_per_base: u32,
    pub warnings: Vec<String>,
}

/// Physical production plan for a job
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProductionResult {
    /// Useful sheets to run, waste included
    pub pliegos_utiles: u64,
    /// Base sheets to purchase
    pub pliegos_base: u64,
    /// Pieces per useful sheet (override or auto)
    pub formas_por_pliego: u64,
    pub formas_horizontal: u64,
    pub formas_vertical: u64,
    pub formas_auto: u64,
    pub colores: Colors,
    /// Printing plates (front + back inks)
    pub chapas: u32,
    pub pasadas: u32,
    pub capacidad_color: u32,
    pub tiempo_arranque_horas: f64,
    pub tiempo_tiraje_horas: f64,
    pub tiempo_horas: f64,
    pub costo_produccion: f64,
    /// Waste sheets, setup waste included
    pub merma_pliegos: u64,
    pub merma_setup: u64,
    pub merma_pct: u64,
    /// Piece size with bleed (width, height)
    pub pieza_mm: (f64, f64),
    /// Printable area after gripper, tail and side margins
    pub area_util_mm: (f64, f64),
    pub sheet: SheetContext,
    pub is_viable: bool,
    pub warnings: Vec<String>,
}

/// Which sheet-count algorithm priced a quote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SheetStrategyKind {
    /// quantity / forms × (1 + waste), no geometry
    FlatRatio,
    /// Full imposition and waste model
    FullGeometry,
}

impl SheetStrategyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SheetStrategyKind::FlatRatio => "flat_ratio",
            SheetStrategyKind::FullGeometry => "full_geometry",
        }
    }
}

/// One finishing process line of a quote
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProcessLine {
    pub id: u64,
    pub nombre: String,
    pub modo_cobro: crate::catalog::ChargeMode,
    pub multiplicador: f64,
    pub costo_unitario: f64,
    pub subtotal: f64,
}

/// Monetized quote
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuoteResult {
    pub pliegos_necesarios: u64,
    pub precio_pliego: f64,
    pub costo_papel: f64,
    pub costo_procesos: f64,
    pub costo_maquina: f64,
    pub subtotal: f64,
    pub margen: f64,
    pub total: f64,
    pub margen_pct: f64,
    pub precio_unitario: f64,
    pub horas: f64,
    pub costo_hora: f64,
    pub material: Option<crate::catalog::Material>,
    pub maquina: Option<crate::catalog::Machine>,
    /// Press picked automatically (cheapest active)
    pub maquina_por_defecto: bool,
    pub procesos: Vec<ProcessLine>,
    pub estrategia: SheetStrategyKind,
    pub produccion: Option<ProductionResult>,
    pub warnings: Vec<String>,
    pub price_note: Option<String>,
}

/// Push a warning unless an identical one is already present
pub(crate) fn push_unique(warnings: &mut Vec<String>, warning: impl Into<String>) {
    let warning = warning.into();
    if !warnings.contains(&warning) {
        warnings.push(warning);
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use super::*;
    use serde::{Deserialize, Serialize};

    impl Serialize for CutFraction {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            serializer.serialize_str(self.as_str())
        }
    }

    impl<'de> Deserialize<'de> for CutFraction {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            CutFraction::parse(&s).ok_or_else(|| serde::de::Error::custom("Unknown cut fraction"))
        }
    }

    impl Serialize for Colors {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            serializer.collect_str(self)
        }
    }

    impl<'de> Deserialize<'de> for Colors {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            Ok(Colors::parse(&s))
        }
    }
} // end of serde_impls module

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colors_parse() {
        assert_eq!(Colors::parse("4/0"), Colors::new(4, 0));
        assert_eq!(Colors::parse(" 4 / 4 "), Colors::new(4, 4));
        assert_eq!(Colors::parse("2"), Colors::new(2, 0));
        assert_eq!(Colors::parse("-1/3"), Colors::new(0, 3));
        assert_eq!(Colors::parse("cmyk/x"), Colors::new(0, 0));
        assert_eq!(Colors::parse(""), Colors::new(0, 0));
    }

    #[test]
    fn test_colors_plates_and_faces() {
        let colors = Colors::new(4, 1);
        assert_eq!(colors.plates(), 5);
        assert_eq!(colors.active_faces(), 4);
        assert_eq!(colors.to_string(), "4/1");

        let huge = Colors::parse("4294967295/1");
        assert_eq!(huge.plates(), u32::MAX);
    }

    #[test]
    fn test_cut_fraction_parse() {
        assert_eq!(CutFraction::parse("1/3"), Some(CutFraction::Third));
        assert_eq!(CutFraction::parse(" 1 / 4"), Some(CutFraction::Quarter));
        assert_eq!(CutFraction::parse("1/5"), None);
        assert_eq!(CutFraction::Quarter.pieces(), 4);
    }

    #[test]
    fn test_missing_fields_message() {
        let err = QuoteError::MissingFields(vec!["pages".into(), "binding".into()]);
        assert_eq!(err.to_string(), "Missing required fields: pages, binding");
    }
}
