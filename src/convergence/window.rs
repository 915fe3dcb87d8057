use crate::Utility;
use serde::Deserialize;
use serde::Serialize;
use std::collections::VecDeque;

/// Fixed-capacity FIFO of recent payoff vectors, stored column-wise per player.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    capacity: usize,
    columns: Vec<VecDeque<Utility>>,
}

impl Window {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            columns: Vec::new(),
        }
    }

    pub fn push(&mut self, payoffs: &[Utility]) {
        if self.columns.len() < payoffs.len() {
            self.columns
                .resize_with(payoffs.len(), || VecDeque::with_capacity(self.capacity));
        }
        for (column, &payoff) in self.columns.iter_mut().zip(payoffs) {
            if column.len() == self.capacity {
                column.pop_front();
            }
            column.push_back(payoff);
        }
    }

    /// Change capacity, dropping the oldest entries if it shrinks.
    pub fn resize(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        for column in self.columns.iter_mut() {
            while column.len() > self.capacity {
                column.pop_front();
            }
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, VecDeque::len)
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    pub fn is_full(&self) -> bool {
        self.len() == self.capacity
    }
    pub fn players(&self) -> usize {
        self.columns.len()
    }

    /// One player's payoffs, oldest first.
    pub fn column(&self, player: usize) -> Vec<Utility> {
        self.columns
            .get(player)
            .map(|c| c.iter().copied().collect())
            .unwrap_or_default()
    }
}

impl Serialize for Window {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let columns = (0..self.players()).map(|p| self.column(p)).collect::<Vec<_>>();
        (self.capacity(), columns).serialize(serializer)
    }
}
impl<'de> Deserialize<'de> for Window {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let (capacity, columns) = <(usize, Vec<Vec<Utility>>)>::deserialize(deserializer)?;
        let mut window = Window::new(capacity);
        let rows = columns.first().map_or(0, Vec::len);
        if let Some(ragged) = columns.iter().position(|c| c.len() != rows) {
            return Err(serde::de::Error::custom(format!(
                "window column {} holds {} payoffs, expected {}",
                ragged,
                columns[ragged].len(),
                rows
            )));
        }
        for i in 0..rows {
            window.push(&columns.iter().map(|c| c[i]).collect::<Vec<_>>());
        }
        Ok(window)
    }
}
