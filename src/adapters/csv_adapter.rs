//! CSV file data adapter.
//!
//! One file per subscription at `<base>/<market>/<symbol>.csv`, both path
//! components lowercased. The header is resolved through [`TabularSchema`].

use crate::domain::data::DataPoint;
use crate::domain::error::TradefeedError;
use crate::domain::subscription::SubscriptionConfig;
use crate::domain::tabular::TabularSchema;
use crate::ports::data_port::DataPort;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, market: &str, symbol: &str) -> PathBuf {
        self.base_path
            .join(market.to_lowercase())
            .join(format!("{}.csv", symbol.to_lowercase()))
    }
}

fn in_file(path: &Path, err: TradefeedError) -> TradefeedError {
    match err {
        TradefeedError::DataParse { reason, .. } => TradefeedError::DataParse {
            source_name: path.display().to_string(),
            reason,
        },
        other => other,
    }
}

impl DataPort for CsvAdapter {
    fn fetch(&self, config: &SubscriptionConfig) -> Result<Vec<DataPoint>, TradefeedError> {
        let path = self.csv_path(config.market(), config.mapped_symbol());
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no data file for subscription");
                return Ok(Vec::new());
            }
            Err(e) => return Err(TradefeedError::Io(e)),
        };

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let headers = rdr.headers().map_err(|e| TradefeedError::DataParse {
            source_name: path.display().to_string(),
            reason: format!("CSV header error: {}", e),
        })?;
        let header: Vec<&str> = headers.iter().collect();
        let schema = TabularSchema::from_header(&header).map_err(|e| in_file(&path, e))?;

        let mut points = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| TradefeedError::DataParse {
                source_name: path.display().to_string(),
                reason: format!("CSV parse error: {}", e),
            })?;
            let cells: Vec<&str> = record.iter().collect();
            let row = schema.parse_row(&cells).map_err(|e| in_file(&path, e))?;
            points.push(DataPoint {
                subscription_index: config.subscription_index(),
                symbol: config.symbol().to_string(),
                time: row.time,
                value: row.value,
            });
        }

        points.sort_by_key(|p| p.time);
        debug!(path = %path.display(), points = points.len(), "loaded data file");
        Ok(points)
    }
}
