//! Catalog snapshot records
//!
//! Materials, presses and finishing processes are owned by the host
//! application. The engine receives them as a read-only snapshot per call
//! and never caches or mutates them.

use crate::constants::DEFAULT_COLOR_CAPACITY;
use crate::types::*;
use regex::Regex;
use std::sync::LazyLock;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

static INTEGER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("valid regex"));

/// Paper stock priced per base sheet
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Material {
    pub id: u64,
    pub nombre: String,
    /// Current price per base sheet, `None` when no price is set
    pub precio_vigente: Option<f64>,
    /// Declared base format, e.g. "70x100"
    pub formato_base: Option<String>,
}

/// Printing press
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Machine {
    pub id: u64,
    pub nombre: String,
    /// Free text that carries the color capacity, e.g. "Offset 4 colores"
    pub tipo: String,
    pub costo_hora: f64,
    pub rendimiento_hora: Option<f64>,
    pub rendimiento_pliegos_hora: Option<f64>,
    pub setup_min: f64,
    pub activo: bool,
}

impl Default for Machine {
    fn default() -> Self {
        Self {
            id: 0,
            nombre: String::new(),
            tipo: String::new(),
            costo_hora: 0.0,
            rendimiento_hora: None,
            rendimiento_pliegos_hora: None,
            setup_min: 0.0,
            activo: true,
        }
    }
}

impl Machine {
    /// First integer found in `tipo`, or the default capacity
    pub fn color_capacity(&self) -> u32 {
        first_integer(&self.tipo)
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_COLOR_CAPACITY)
    }

    /// Sheets per hour, preferring the per-sheet rating
    pub fn sheets_per_hour(&self) -> f64 {
        self.rendimiento_pliegos_hora
            .filter(|&v| v > 0.0)
            .or(self.rendimiento_hora)
            .unwrap_or(0.0)
            .max(0.0)
    }

    /// Setup time in minutes, never negative
    pub fn setup_minutes(&self) -> f64 {
        self.setup_min.max(0.0)
    }
}

fn first_integer(text: &str) -> Option<u32> {
    INTEGER_RE.find(text)?.as_str().parse().ok()
}

/// How a finishing process is charged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ChargeMode {
    PorHora,
    PorUnidad,
    PorPliego,
    PorMillar,
    PorM2,
    PorKg,
    #[default]
    Fijo,
}

/// Finishing process (lamination, die-cut, binding...)
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Process {
    pub id: u64,
    pub nombre: String,
    pub modo_cobro: ChargeMode,
    pub costo_base: f64,
}

/// Read-only snapshot of the host's catalog
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Catalog {
    pub materials: Vec<Material>,
    pub presses: Vec<Machine>,
    pub processes: Vec<Process>,
}

impl Catalog {
    pub fn material(&self, id: u64) -> Option<&Material> {
        self.materials.iter().find(|m| m.id == id)
    }

    pub fn press(&self, id: u64) -> Option<&Machine> {
        self.presses.iter().find(|p| p.id == id)
    }

    /// Processes in the caller's order; unknown ids are skipped
    pub fn processes(&self, ids: &[u64]) -> Vec<&Process> {
        ids.iter()
            .filter_map(|id| self.processes.iter().find(|p| p.id == *id))
            .collect()
    }

    pub fn active_presses(&self) -> impl Iterator<Item = &Machine> {
        self.presses.iter().filter(|p| p.activo)
    }

    /// Active press with the lowest hourly cost. Ties go to the lowest id,
    /// ids being assigned in creation order.
    pub fn cheapest_active_press(&self) -> Option<&Machine> {
        self.active_presses().min_by(|a, b| {
            a.costo_hora
                .total_cmp(&b.costo_hora)
                .then_with(|| a.id.cmp(&b.id))
        })
    }

    /// Load a catalog snapshot from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let catalog = serde_json::from_slice(&bytes)
            .map_err(|e| QuoteError::Config(format!("Failed to parse catalog: {}", e)))?;
        Ok(catalog)
    }

    /// Save the snapshot to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| QuoteError::Config(format!("Failed to serialize catalog: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(id: u64, costo_hora: f64, activo: bool) -> Machine {
        Machine {
            id,
            nombre: format!("Press {id}"),
            costo_hora,
            activo,
            ..Default::default()
        }
    }

    #[test]
    fn test_color_capacity_from_type() {
        let mut machine = Machine::default();
        assert_eq!(machine.color_capacity(), 4);

        machine.tipo = "Offset 2 colores".to_string();
        assert_eq!(machine.color_capacity(), 2);

        machine.tipo = "Heidelberg SM52-5".to_string();
        assert_eq!(machine.color_capacity(), 52);

        machine.tipo = "Digital 0".to_string();
        assert_eq!(machine.color_capacity(), 4);

        // Too large for a capacity
        machine.tipo = "Offset 99999999999".to_string();
        assert_eq!(machine.color_capacity(), 4);
    }

    #[test]
    fn test_sheets_per_hour_preference() {
        let mut machine = Machine {
            rendimiento_hora: Some(300.0),
            ..Default::default()
        };
        assert_eq!(machine.sheets_per_hour(), 300.0);

        machine.rendimiento_pliegos_hora = Some(500.0);
        assert_eq!(machine.sheets_per_hour(), 500.0);

        machine.rendimiento_pliegos_hora = Some(0.0);
        assert_eq!(machine.sheets_per_hour(), 300.0);

        machine.rendimiento_hora = Some(-10.0);
        assert_eq!(machine.sheets_per_hour(), 0.0);
    }

    #[test]
    fn test_cheapest_active_press() {
        let catalog = Catalog {
            presses: vec![
                press(3, 40.0, true),
                press(1, 25.0, false),
                press(7, 30.0, true),
                press(5, 30.0, true),
            ],
            ..Default::default()
        };
        assert_eq!(catalog.cheapest_active_press().map(|p| p.id), Some(5));
        assert_eq!(Catalog::default().cheapest_active_press(), None);
    }

    #[test]
    fn test_processes_keep_order_and_skip_unknown() {
        let catalog = Catalog {
            processes: vec![
                Process {
                    id: 1,
                    ..Default::default()
                },
                Process {
                    id: 2,
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let ids: Vec<u64> = catalog.processes(&[2, 9, 1]).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }
}
