/// A named unit of planned time with a tracked actual-elapsed counter.
#[derive(Debug, Clone, PartialEq)]
pub struct Topic {
    pub name: String,
    pub planned_minutes: f64,
    pub actual_secs: u64,
}

impl Topic {
    pub fn new(name: impl Into<String>, planned_minutes: f64) -> Self {
        Self {
            name: name.into(),
            planned_minutes,
            actual_secs: 0,
        }
    }

    /// Planned duration in whole seconds, rounded from fractional minutes.
    pub fn planned_secs(&self) -> i64 {
        (self.planned_minutes * 60.0).round() as i64
    }
}

/// Ordered topic list; insertion order is display and playback order.
/// Deletion is the only operation that touches ordering, and it preserves
/// the relative order of survivors.
#[derive(Debug, Clone, Default)]
pub struct Agenda {
    topics: Vec<Topic>,
}

impl Agenda {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a topic. Rejects (no-op, returns false) an empty trimmed name
    /// or a non-positive/non-finite duration.
    pub fn add(&mut self, name: &str, minutes: f64) -> bool {
        let name = name.trim();
        if name.is_empty() || !minutes.is_finite() || minutes <= 0.0 {
            return false;
        }
        self.topics.push(Topic::new(name, minutes));
        true
    }

    /// Remove the topic at `index`. Out-of-range is a no-op.
    pub fn remove(&mut self, index: usize) -> bool {
        if index >= self.topics.len() {
            return false;
        }
        self.topics.remove(index);
        true
    }

    pub fn get(&self, index: usize) -> Option<&Topic> {
        self.topics.get(index)
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Credit one elapsed second to the topic at `index`.
    pub(crate) fn credit(&mut self, index: usize) {
        if let Some(topic) = self.topics.get_mut(index) {
            topic.actual_secs += 1;
        }
    }

    pub(crate) fn zero_actuals(&mut self) {
        for topic in &mut self.topics {
            topic.actual_secs = 0;
        }
    }

    pub fn total_planned_minutes(&self) -> f64 {
        self.topics.iter().map(|t| t.planned_minutes).sum()
    }

    pub fn total_actual_secs(&self) -> u64 {
        self.topics.iter().map(|t| t.actual_secs).sum()
    }
}
