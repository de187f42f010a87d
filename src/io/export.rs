//! Export mapping results to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.
//! Unassigned test points keep their row, with the assignment fields left empty.

use std::fs::File;
use std::path::Path;

use crate::domain::MappingResult;
use crate::error::AppError;

const HEADER: [&str; 6] = ["x", "y", "assigned", "delta_y", "ideal_function", "training_series"];

/// Write per-point mapping results to a CSV file.
///
/// With `assigned_only`, unassigned points are left out.
pub fn write_mapping_csv(path: &Path, mapping: &MappingResult, assigned_only: bool) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut writer = csv::Writer::from_writer(file);

    writer
        .write_record(HEADER)
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for m in &mapping.mappings {
        if assigned_only && !m.assigned() {
            continue;
        }

        let (assigned, delta_y, candidate, training) = match &m.assignment {
            Some(a) => (
                "true",
                format!("{:.6}", a.deviation),
                a.candidate_id.as_str(),
                a.training_id.as_str(),
            ),
            None => ("false", String::new(), "", ""),
        };

        writer
            .write_record([
                m.point.x.to_string().as_str(),
                m.point.y.to_string().as_str(),
                assigned,
                delta_y.as_str(),
                candidate,
                training,
            ])
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;

    log::info!("Mapping results written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Assignment, Mapping, Point};

    fn sample() -> MappingResult {
        MappingResult {
            mappings: vec![
                Mapping {
                    point: Point::new(1.0, 2.5),
                    assignment: Some(Assignment {
                        candidate_id: "y7".to_string(),
                        training_id: "y1".to_string(),
                        deviation: 0.25,
                    }),
                },
                Mapping {
                    point: Point::new(2.0, -1.0),
                    assignment: None,
                },
            ],
        }
    }

    fn export(name: &str, assigned_only: bool) -> String {
        let dir = std::env::temp_dir().join(format!("ideal-export-{}-{name}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("mapping.csv");
        write_mapping_csv(&path, &sample(), assigned_only).unwrap();
        std::fs::read_to_string(path).unwrap()
    }

    #[test]
    fn writes_all_points() {
        let expected = concat!(
            "x,y,assigned,delta_y,ideal_function,training_series\n",
            "1,2.5,true,0.250000,y7,y1\n",
            "2,-1,false,,,\n",
        );
        assert_eq!(export("all", false), expected);
    }

    #[test]
    fn assigned_only_drops_unassigned_rows() {
        let txt = export("assigned", true);
        assert_eq!(txt.lines().count(), 2);
        assert!(!txt.contains("false"));
    }
}
