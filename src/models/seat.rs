use serde::Serialize;

/// Одно место в схеме салона. Создается при построении схемы и больше не меняется.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatCell {
    /// Сквозной номер места, с 1, построчно.
    pub id: u32,
    pub row_index: usize,
    pub column_index: usize,
    pub status: SeatStatus,
    pub tooltip: String,
}

impl SeatCell {
    pub fn is_reserved(&self) -> bool {
        matches!(self.status, SeatStatus::Reserved)
    }

    /// Цена места, если оно доступно для выбора.
    pub fn price(&self) -> Option<f64> {
        match &self.status {
            SeatStatus::Available(assignment) => Some(assignment.price),
            SeatStatus::Reserved => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatStatus {
    Available(SeatAssignment),
    Reserved,
}

/// Привязка места к квоте, из которой оно выделено.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatAssignment {
    /// Индекс квоты во входном списке.
    pub quota_index: usize,
    pub class_type: String,
    pub seat_option: String,
    pub price: f64,
}

/// Готовая схема салона: строки мест.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatLayout {
    pub rows: Vec<Vec<SeatCell>>,
}

impl SeatLayout {
    pub fn cells(&self) -> impl Iterator<Item = &SeatCell> {
        self.rows.iter().flatten()
    }

    pub fn capacity(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    pub fn available_count(&self) -> usize {
        self.cells().filter(|cell| !cell.is_reserved()).count()
    }

    pub fn seat(&self, id: u32) -> Option<&SeatCell> {
        self.cells().find(|cell| cell.id == id)
    }
}
