//! `spreadsheets.values` endpoints.

use insights_core::CellValue;

use crate::address::{cell_range, quote_tab};
use crate::client::SheetsClient;
use crate::error::SheetsError;
use crate::types::{UpdateValuesResponse, ValueRange, ValueRangeUpdate};

impl SheetsClient {
    /// Reads an A1 range as rows of [`CellValue`]s.
    ///
    /// Values are requested with `valueRenderOption=FORMULA` so that
    /// `HYPERLINK(...)` formulas come back verbatim, and with
    /// `dateTimeRenderOption=FORMATTED_STRING` so dates arrive as text rather
    /// than serial numbers. Rows are padded with [`CellValue::Empty`] to the
    /// widest row.
    ///
    /// # Errors
    ///
    /// - [`SheetsError::NotFound`] if the spreadsheet is missing or not shared.
    /// - [`SheetsError::UnexpectedStatus`] for other API failures, e.g. an
    ///   unknown tab (HTTP 400 "Unable to parse range").
    /// - [`SheetsError::Http`] on network failure.
    pub async fn read_range(
        &self,
        spreadsheet_id: &str,
        range: &str,
    ) -> Result<Vec<Vec<CellValue>>, SheetsError> {
        let url = self.build_values_url(
            spreadsheet_id,
            range,
            &[
                ("valueRenderOption", "FORMULA"),
                ("dateTimeRenderOption", "FORMATTED_STRING"),
                ("majorDimension", "ROWS"),
            ],
        )?;
        let body: ValueRange = self.get_json(&url).await?;

        let width = body.values.iter().map(Vec::len).max().unwrap_or(0);
        let rows: Vec<Vec<CellValue>> = body
            .values
            .iter()
            .map(|row| {
                let mut cells: Vec<CellValue> = row.iter().map(CellValue::from_json).collect();
                cells.resize(width, CellValue::Empty);
                cells
            })
            .collect();

        tracing::debug!(range, rows = rows.len(), columns = width, "read sheet range");
        Ok(rows)
    }

    /// Reads every populated cell of a tab.
    ///
    /// # Errors
    ///
    /// Same as [`SheetsClient::read_range`].
    pub async fn read_tab(
        &self,
        spreadsheet_id: &str,
        tab: &str,
    ) -> Result<Vec<Vec<CellValue>>, SheetsError> {
        self.read_range(spreadsheet_id, &quote_tab(tab)).await
    }

    /// Reads a single cell, e.g. `A1` of `Sheet1`. A blank cell is
    /// [`CellValue::Empty`].
    ///
    /// # Errors
    ///
    /// Same as [`SheetsClient::read_range`].
    pub async fn read_cell(
        &self,
        spreadsheet_id: &str,
        tab: &str,
        cell: &str,
    ) -> Result<CellValue, SheetsError> {
        let rows = self
            .read_range(spreadsheet_id, &cell_range(tab, cell))
            .await?;
        Ok(rows
            .into_iter()
            .next()
            .and_then(|row| row.into_iter().next())
            .unwrap_or(CellValue::Empty))
    }

    /// Overwrites a single cell with raw text (no formula or date parsing on
    /// Google's side).
    ///
    /// # Errors
    ///
    /// Same as [`SheetsClient::read_range`].
    pub async fn write_cell(
        &self,
        spreadsheet_id: &str,
        tab: &str,
        cell: &str,
        value: &str,
    ) -> Result<UpdateValuesResponse, SheetsError> {
        let range = cell_range(tab, cell);
        let url = self.build_values_url(spreadsheet_id, &range, &[("valueInputOption", "RAW")])?;
        let body = ValueRangeUpdate {
            range: &range,
            major_dimension: "ROWS",
            values: vec![vec![value]],
        };
        let response: UpdateValuesResponse = self.put_json(&url, &body).await?;
        tracing::debug!(
            range = %range,
            updated_cells = response.updated_cells,
            "wrote sheet cell"
        );
        Ok(response)
    }
}
