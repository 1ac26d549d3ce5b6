/// Обратный отсчет до следующего обновления: от потолка до нуля, потом сброс.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    ceiling: u32,
    remaining: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Отсчет продолжается, осталось столько секунд.
    Running(u32),
    /// Время вышло: пора обновлять данные, счетчик уже сброшен на потолок.
    Expired,
}

impl Countdown {
    pub fn new(ceiling: u32) -> Self {
        let ceiling = ceiling.max(1);
        Self {
            ceiling,
            remaining: ceiling,
        }
    }

    pub fn tick(&mut self) -> Tick {
        if self.remaining <= 1 {
            self.remaining = self.ceiling;
            Tick::Expired
        } else {
            self.remaining -= 1;
            Tick::Running(self.remaining)
        }
    }

    pub fn reset(&mut self) {
        self.remaining = self.ceiling;
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn ceiling(&self) -> u32 {
        self.ceiling
    }

    /// (минуты, секунды) для отображения таймера
    pub fn minutes_seconds(&self) -> (u32, u32) {
        (self.remaining / 60, self.remaining % 60)
    }
}
