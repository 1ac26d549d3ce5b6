//! Построение схемы салона из квот мест.
//!
//! Квоты раскладываются в плоский список мест в исходном порядке и
//! рассаживаются по номерам 1..=capacity построчно. Когда квоты заканчиваются,
//! оставшиеся места заполняются заглушками `Reserved`. Если квот больше, чем
//! мест в салоне, лишние просто не получают места.

use thiserror::Error;
use tracing::debug;

use crate::models::{SeatAssignment, SeatCell, SeatLayout, SeatQuota, SeatStatus};

pub const RESERVED_TOOLTIP: &str = "Unavailable seat";

#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    #[error("invalid seat quota {class_type}/{seat_option}: count {count} is negative")]
    InvalidQuota {
        class_type: String,
        seat_option: String,
        count: i64,
    },

    #[error("invalid seat grid: capacity {capacity}, row width {row_width}")]
    InvalidGrid { capacity: usize, row_width: usize },
}

/// Форма салона: всего мест и мест в ряду.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatGrid {
    capacity: usize,
    row_width: usize,
}

impl SeatGrid {
    pub fn new(capacity: usize, row_width: usize) -> Result<Self, LayoutError> {
        if capacity == 0 || row_width == 0 {
            return Err(LayoutError::InvalidGrid { capacity, row_width });
        }
        Ok(Self { capacity, row_width })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn row_width(&self) -> usize {
        self.row_width
    }

    pub fn row_count(&self) -> usize {
        self.capacity.div_ceil(self.row_width)
    }
}

pub fn build_layout(quotas: &[SeatQuota], grid: &SeatGrid) -> Result<SeatLayout, LayoutError> {
    // Сначала проверяем все квоты, чтобы не собрать схему наполовину
    if let Some(bad) = quotas.iter().find(|quota| quota.amount < 0) {
        return Err(LayoutError::InvalidQuota {
            class_type: bad.class_type.clone(),
            seat_option: bad.seat_option.clone(),
            count: bad.amount,
        });
    }

    let mut units = quotas
        .iter()
        .enumerate()
        .flat_map(|(index, quota)| std::iter::repeat((index, quota)).take(quota.amount as usize));

    let mut rows = Vec::with_capacity(grid.row_count());
    for row_index in 0..grid.row_count() {
        // Последний ряд обрезается по вместимости, а не добивается до полной ширины
        let first_id = row_index * grid.row_width;
        let width = grid.row_width.min(grid.capacity - first_id);

        let row: Vec<SeatCell> = (0..width)
            .map(|column_index| {
                let id = (first_id + column_index + 1) as u32;
                match units.next() {
                    Some((quota_index, quota)) => available_cell(id, row_index, column_index, quota_index, quota),
                    None => reserved_cell(id, row_index, column_index),
                }
            })
            .collect();
        rows.push(row);
    }

    let layout = SeatLayout { rows };
    debug!(
        "Built seat layout: {} seats, {} available",
        layout.capacity(),
        layout.available_count()
    );
    Ok(layout)
}

fn available_cell(
    id: u32,
    row_index: usize,
    column_index: usize,
    quota_index: usize,
    quota: &SeatQuota,
) -> SeatCell {
    SeatCell {
        id,
        row_index,
        column_index,
        status: SeatStatus::Available(SeatAssignment {
            quota_index,
            class_type: quota.class_type.clone(),
            seat_option: quota.seat_option.clone(),
            price: quota.price,
        }),
        tooltip: format!("{} - {} - ${}", quota.class_type, quota.seat_option, quota.price),
    }
}

fn reserved_cell(id: u32, row_index: usize, column_index: usize) -> SeatCell {
    SeatCell {
        id,
        row_index,
        column_index,
        status: SeatStatus::Reserved,
        tooltip: RESERVED_TOOLTIP.to_string(),
    }
}
