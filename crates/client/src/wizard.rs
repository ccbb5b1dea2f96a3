// New-sheet wizard: details, then suggested columns, then create

use autosheet_engine::{SheetId, Store, StoreError};

use crate::error::FlowError;
use crate::gateway::Gateway;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WizardStep {
    /// Title and description entry
    #[default]
    Details,
    /// Column selection, seeded from suggestions
    Columns,
}

/// Two-step flow that collects what a new sheet needs.
///
/// `Details` gathers title and description. Continuing asks the service
/// for column suggestions and preselects them; the caller can then add,
/// remove and pick an index column before [`finish`](Self::finish)
/// creates the sheet.
#[derive(Debug, Clone, Default)]
pub struct NewSheetWizard {
    step: WizardStep,
    title: String,
    description: String,
    suggested: Vec<String>,
    columns: Vec<String>,
    index_column: Option<String>,
}

impl NewSheetWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Both details are filled in.
    pub fn can_continue(&self) -> bool {
        !self.title.trim().is_empty() && !self.description.trim().is_empty()
    }

    /// Fetch column suggestions and move to `Columns`.
    ///
    /// On failure the wizard stays on `Details` with its inputs intact.
    pub fn continue_with<G: Gateway + ?Sized>(&mut self, gateway: &G) -> Result<(), FlowError> {
        if self.step != WizardStep::Details {
            return Ok(());
        }
        if !self.can_continue() {
            return Err(FlowError::InvalidInput("Title and description are required".into()));
        }

        let suggestions = match gateway.suggest_columns(self.description.trim()) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("column suggestion failed: {}", e);
                return Err(e.into());
            }
        };

        let mut columns: Vec<String> = Vec::with_capacity(suggestions.len());
        for name in suggestions {
            let name = name.trim().to_string();
            if !name.is_empty() && !columns.contains(&name) {
                columns.push(name);
            }
        }
        log::debug!("{} columns suggested", columns.len());

        self.suggested = columns.clone();
        self.columns = columns;
        self.index_column = None;
        self.step = WizardStep::Columns;
        Ok(())
    }

    /// Columns the service suggested, in its order.
    pub fn suggested(&self) -> &[String] {
        &self.suggested
    }

    /// Columns the sheet will be created with.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn index_column(&self) -> Option<&str> {
        self.index_column.as_deref()
    }

    /// Returns false if the name was blank or already present.
    pub fn add_column(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.columns.iter().any(|c| c == name) {
            return false;
        }
        self.columns.push(name.to_string());
        true
    }

    pub fn remove_column(&mut self, name: &str) -> bool {
        let Some(pos) = self.columns.iter().position(|c| c == name) else {
            return false;
        };
        self.columns.remove(pos);
        if self.index_column.as_deref() == Some(name) {
            self.index_column = None;
        }
        true
    }

    /// Choose the index column. `None` clears the choice.
    pub fn set_index_column(&mut self, name: Option<&str>) -> Result<(), FlowError> {
        match name {
            Some(name) if !self.columns.iter().any(|c| c == name) => {
                Err(StoreError::UnknownColumn(name.to_string()).into())
            }
            Some(name) => {
                self.index_column = Some(name.to_string());
                Ok(())
            }
            None => {
                self.index_column = None;
                Ok(())
            }
        }
    }

    /// On the `Columns` step with at least one column and an index column
    /// chosen.
    pub fn can_finish(&self) -> bool {
        self.step == WizardStep::Columns && !self.columns.is_empty() && self.index_column.is_some()
    }

    /// Create the sheet (it becomes active) and reset the wizard.
    ///
    /// Needs at least one column and an index column.
    pub fn finish(&mut self, store: &mut Store) -> Result<SheetId, FlowError> {
        if self.step != WizardStep::Columns {
            return Err(FlowError::InvalidInput("Column suggestions have not been fetched yet".into()));
        }
        if self.columns.is_empty() {
            return Err(StoreError::NoColumns.into());
        }
        let Some(index_column) = self.index_column.as_deref() else {
            return Err(StoreError::NoIndexColumn.into());
        };

        let id = store.add_sheet(
            self.title.trim(),
            self.description.trim(),
            self.columns.clone(),
            index_column,
        )?;
        log::info!("created sheet {} ({})", id, self.title.trim());
        self.reset();
        Ok(id)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientError;
    use crate::fake::{Call, FakeGateway};

    fn strings(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn details(wizard: &mut NewSheetWizard) {
        wizard.set_title("EV makers");
        wizard.set_description("Electric vehicle manufacturers");
    }

    #[test]
    fn test_details_required() {
        let mut wizard = NewSheetWizard::new();
        let gateway = FakeGateway::default();
        wizard.set_title("EV makers");
        assert!(!wizard.can_continue());

        let err = wizard.continue_with(&gateway).unwrap_err();
        assert!(matches!(err, FlowError::InvalidInput(_)));
        assert!(gateway.calls().is_empty());
    }

    #[test]
    fn test_continue_preselects_suggestions() {
        let mut wizard = NewSheetWizard::new();
        details(&mut wizard);
        let gateway = FakeGateway::default();
        *gateway.suggestions.borrow_mut() = Some(Ok(strings(&["company", " country ", "", "company", "ceo"])));

        wizard.continue_with(&gateway).unwrap();

        assert_eq!(wizard.step(), WizardStep::Columns);
        assert_eq!(wizard.columns(), strings(&["company", "country", "ceo"]).as_slice());
        assert_eq!(wizard.suggested(), wizard.columns());
        assert_eq!(
            gateway.calls(),
            vec![Call::Suggest("Electric vehicle manufacturers".into())]
        );
    }

    #[test]
    fn test_failed_suggestion_stays_on_details() {
        let mut wizard = NewSheetWizard::new();
        details(&mut wizard);
        let gateway = FakeGateway::default();
        *gateway.suggestions.borrow_mut() = Some(Err(ClientError::Http(500, "boom".into())));

        let err = wizard.continue_with(&gateway).unwrap_err();
        assert!(matches!(err, FlowError::Gateway(ClientError::Http(500, _))));
        assert_eq!(wizard.step(), WizardStep::Details);
        assert_eq!(wizard.title(), "EV makers");
        assert!(wizard.columns().is_empty());
    }

    #[test]
    fn test_column_editing() {
        let mut wizard = NewSheetWizard::new();
        details(&mut wizard);
        let gateway = FakeGateway::default();
        *gateway.suggestions.borrow_mut() = Some(Ok(strings(&["company", "country"])));
        wizard.continue_with(&gateway).unwrap();

        assert!(wizard.add_column("founded"));
        assert!(!wizard.add_column("  "));
        assert!(!wizard.add_column("country"));

        wizard.set_index_column(Some("company")).unwrap();
        assert!(wizard.set_index_column(Some("nope")).is_err());
        assert_eq!(wizard.index_column(), Some("company"));

        assert!(wizard.remove_column("company"));
        assert!(!wizard.remove_column("company"));
        assert_eq!(wizard.index_column(), None);
        assert_eq!(wizard.columns(), strings(&["country", "founded"]).as_slice());
    }

    #[test]
    fn test_finish_creates_active_sheet_and_resets() {
        let mut wizard = NewSheetWizard::new();
        details(&mut wizard);
        let gateway = FakeGateway::default();
        *gateway.suggestions.borrow_mut() = Some(Ok(strings(&["country", "company"])));
        wizard.continue_with(&gateway).unwrap();
        wizard.set_index_column(Some("company")).unwrap();
        assert!(wizard.can_finish());

        let mut store = Store::new();
        let id = wizard.finish(&mut store).unwrap();

        let sheet = store.sheet(&id).unwrap();
        assert_eq!(sheet.title(), "EV makers");
        assert_eq!(sheet.columns(), strings(&["company", "country"]).as_slice());
        assert_eq!(sheet.index_column(), "company");
        assert_eq!(sheet.row_count(), 10);
        assert_eq!(store.active_sheet_id(), Some(&id));

        assert_eq!(wizard.step(), WizardStep::Details);
        assert!(wizard.title().is_empty());
    }

    #[test]
    fn test_finish_needs_columns() {
        let mut wizard = NewSheetWizard::new();
        let mut store = Store::new();
        assert!(matches!(wizard.finish(&mut store), Err(FlowError::InvalidInput(_))));

        details(&mut wizard);
        let gateway = FakeGateway::default();
        *gateway.suggestions.borrow_mut() = Some(Ok(Vec::new()));
        wizard.continue_with(&gateway).unwrap();

        let err = wizard.finish(&mut store).unwrap_err();
        assert!(matches!(err, FlowError::Store(StoreError::NoColumns)));
        assert_eq!(store.sheet_count(), 0);
        assert_eq!(wizard.step(), WizardStep::Columns);
    }

    #[test]
    fn test_finish_needs_index_column() {
        let mut wizard = NewSheetWizard::new();
        details(&mut wizard);
        let gateway = FakeGateway::default();
        *gateway.suggestions.borrow_mut() = Some(Ok(strings(&["company", "country"])));
        wizard.continue_with(&gateway).unwrap();
        assert!(!wizard.can_finish());

        let mut store = Store::new();
        let err = wizard.finish(&mut store).unwrap_err();
        assert!(matches!(err, FlowError::Store(StoreError::NoIndexColumn)));
        assert_eq!(store.sheet_count(), 0);
        assert_eq!(wizard.columns(), strings(&["company", "country"]).as_slice());

        // Removing the chosen index column blocks finishing again
        wizard.set_index_column(Some("country")).unwrap();
        wizard.remove_column("country");
        assert!(matches!(
            wizard.finish(&mut store),
            Err(FlowError::Store(StoreError::NoIndexColumn))
        ));

        wizard.set_index_column(Some("company")).unwrap();
        assert!(wizard.finish(&mut store).is_ok());
    }
}
