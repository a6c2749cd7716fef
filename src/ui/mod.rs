/// egui rendering of the dashboard. Everything here reads `AppState`;
/// only `panels` and `table` mutate it, through `AppState` methods.
pub mod panels;
pub mod plot;
pub mod table;
