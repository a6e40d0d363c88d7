//! Target tables read from CSV (or ECSV, whose `#` metadata lines are skipped).
//!
//! Tables are loaded once by the caller and passed to the query functions.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::{ServiceError, ServiceResult};

/// One row of a cluster summary table (`cluster_name, median_ra, median_dec`).
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterSummary {
    pub cluster_name: String,
    pub median_ra: f64,
    pub median_dec: f64,
}

/// One member star of a cluster (`source_id, Teff, Hmag`).
#[derive(Debug, Clone, PartialEq)]
pub struct StarEntry {
    pub source_id: i64,
    pub t_eff: f64,
    pub h_mag: f64,
}

struct Rows<R: BufRead> {
    table: String,
    reader: R,
    columns: HashMap<String, usize>,
    line: String,
    line_no: usize,
}

impl<R: BufRead> Rows<R> {
    fn new(mut reader: R, table: &str) -> ServiceResult<Self> {
        let mut line = String::new();
        let mut line_no = 0;
        loop {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                return Err(ServiceError::table(table, "EOF before finding header"));
            }
            line_no += 1;
            if !line.starts_with('#') && !line.trim().is_empty() {
                break;
            }
        }
        let columns = split_fields(&line)
            .enumerate()
            .map(|(idx, name)| (name.to_string(), idx))
            .collect();
        Ok(Self {
            table: table.to_string(),
            reader,
            columns,
            line: String::new(),
            line_no,
        })
    }

    fn require_column(&self, name: &str) -> ServiceResult<usize> {
        self.columns
            .get(name)
            .copied()
            .ok_or_else(|| ServiceError::table(&self.table, format!("Missing column: {}", name)))
    }

    /// Reads the next data row, skipping comments and blank lines.
    fn next_row(&mut self) -> ServiceResult<Option<Vec<String>>> {
        loop {
            self.line.clear();
            if self.reader.read_line(&mut self.line)? == 0 {
                return Ok(None);
            }
            self.line_no += 1;
            if self.line.starts_with('#') || self.line.trim().is_empty() {
                continue;
            }
            return Ok(Some(split_fields(&self.line).map(str::to_string).collect()));
        }
    }

    fn parse<T: std::str::FromStr>(
        &self,
        fields: &[String],
        idx: usize,
        name: &str,
    ) -> ServiceResult<T> {
        fields.get(idx).and_then(|v| v.parse().ok()).ok_or_else(|| {
            ServiceError::table(
                &self.table,
                format!("line {}: invalid or missing {}", self.line_no, name),
            )
        })
    }
}

fn split_fields(line: &str) -> impl Iterator<Item = &str> {
    line.trim().split(',').map(|f| f.trim().trim_matches('"'))
}

pub fn read_cluster_summary<R: BufRead>(
    reader: R,
    table: &str,
) -> ServiceResult<Vec<ClusterSummary>> {
    let mut rows = Rows::new(reader, table)?;
    let name_idx = rows.require_column("cluster_name")?;
    let ra_idx = rows.require_column("median_ra")?;
    let dec_idx = rows.require_column("median_dec")?;

    let mut out = Vec::new();
    while let Some(fields) = rows.next_row()? {
        out.push(ClusterSummary {
            cluster_name: rows.parse(&fields, name_idx, "cluster_name")?,
            median_ra: rows.parse(&fields, ra_idx, "median_ra")?,
            median_dec: rows.parse(&fields, dec_idx, "median_dec")?,
        });
    }
    Ok(out)
}

pub fn read_star_list<R: BufRead>(reader: R, table: &str) -> ServiceResult<Vec<StarEntry>> {
    let mut rows = Rows::new(reader, table)?;
    let id_idx = rows.require_column("source_id")?;
    let teff_idx = rows.require_column("Teff")?;
    let hmag_idx = rows.require_column("Hmag")?;

    let mut out = Vec::new();
    while let Some(fields) = rows.next_row()? {
        out.push(StarEntry {
            source_id: rows.parse(&fields, id_idx, "source_id")?,
            t_eff: rows.parse(&fields, teff_idx, "Teff")?,
            h_mag: rows.parse(&fields, hmag_idx, "Hmag")?,
        });
    }
    Ok(out)
}

pub fn load_cluster_summary(path: impl AsRef<Path>) -> ServiceResult<Vec<ClusterSummary>> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    read_cluster_summary(reader, &path.display().to_string())
}

pub fn load_star_list(path: impl AsRef<Path>) -> ServiceResult<Vec<StarEntry>> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    read_star_list(reader, &path.display().to_string())
}
