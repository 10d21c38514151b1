use crate::projection::ChartData;

/// Rendering backend for the completed/pending distribution chart.
pub trait ChartBackend {
    type Instance;

    fn create(&mut self, data: &ChartData) -> Self::Instance;

    fn destroy(&mut self, instance: Self::Instance);
}

/// Holds at most one live chart. Re-rendering tears the previous instance down
/// through the backend before a replacement is created.
pub struct ChartSurface<B: ChartBackend> {
    backend: B,
    current: Option<B::Instance>,
}

impl<B: ChartBackend> ChartSurface<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            current: None,
        }
    }

    pub fn render(&mut self, data: &ChartData) -> &B::Instance {
        if let Some(previous) = self.current.take() {
            self.backend.destroy(previous);
        }
        let instance = self.backend.create(data);
        self.current.insert(instance)
    }

    pub fn current(&self) -> Option<&B::Instance> {
        self.current.as_ref()
    }

    #[cfg(test)]
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: ChartBackend> Drop for ChartSurface<B> {
    fn drop(&mut self) {
        if let Some(instance) = self.current.take() {
            self.backend.destroy(instance);
        }
    }
}

const BAR_WIDTH: usize = 30;

/// Draws the chart as a proportional horizontal bar with the legend below it.
#[derive(Debug, Clone, Default)]
pub struct TerminalChartBackend {
    color: bool,
    live: usize,
}

impl TerminalChartBackend {
    pub fn new(color: bool) -> Self {
        Self { color, live: 0 }
    }

    fn paint(&self, hex: &str, text: &str) -> String {
        match (self.color, hex_to_rgb(hex)) {
            (true, Some((r, g, b))) => format!("\x1b[38;2;{r};{g};{b}m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalChart {
    pub lines: Vec<String>,
}

impl ChartBackend for TerminalChartBackend {
    type Instance = TerminalChart;

    fn create(&mut self, data: &ChartData) -> TerminalChart {
        self.live += 1;
        tracing::trace!(live = self.live, "created terminal chart");

        let total = data.total();
        let mut lines = Vec::new();
        if total == 0 {
            lines.push(format!("[{}]", "·".repeat(BAR_WIDTH)));
        } else {
            let mut bar = String::new();
            let mut used = 0usize;
            for (index, slice) in data.slices.iter().enumerate() {
                let width = if index + 1 == data.slices.len() {
                    BAR_WIDTH - used
                } else {
                    (slice.value * BAR_WIDTH + total / 2) / total
                };
                used += width;
                bar.push_str(&self.paint(slice.color, &"█".repeat(width)));
            }
            lines.push(format!("[{bar}]"));
        }

        let legend = data
            .slices
            .iter()
            .map(|slice| {
                let swatch = self.paint(slice.color, "■");
                format!("{swatch} {} {}", slice.label, slice.value)
            })
            .collect::<Vec<_>>()
            .join("   ");
        lines.push(legend);
        TerminalChart { lines }
    }

    fn destroy(&mut self, instance: TerminalChart) {
        self.live = self.live.saturating_sub(1);
        tracing::trace!(live = self.live, "destroyed terminal chart");
        drop(instance);
    }
}

fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(digits.get(range)?, 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}
