use hdrhistogram::Histogram;
use parking_lot::Mutex;
use std::time::{Duration, Instant};

use crate::types::Label;

#[derive(Debug, Default, Clone, Copy)]
struct Verdicts {
    spam: u64,
    ham: u64,
    rejected: u64,
}

pub struct Metrics {
    latency: Mutex<Histogram<u64>>, // micros
    verdicts: Mutex<Verdicts>,
    started: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            latency: Mutex::new(Histogram::new(3).expect("3 significant figures is a valid precision")),
            verdicts: Mutex::new(Verdicts::default()),
            started: Instant::now(),
        }
    }

    pub fn observe_classification(&self, label: Label, dur: Duration) {
        let micros = dur.as_micros().min(u64::MAX as u128) as u64;
        let _ = self.latency.lock().record(micros.max(1));

        let mut v = self.verdicts.lock();
        match label {
            Label::Spam => v.spam += 1,
            Label::Ham => v.ham += 1,
        }
    }

    pub fn inc_rejected(&self) {
        self.verdicts.lock().rejected += 1;
    }

    pub fn format(&self) -> String {
        let (p50, p95, p99) = {
            let h = self.latency.lock();
            (
                h.value_at_quantile(0.50) as f64 / 1000.0,
                h.value_at_quantile(0.95) as f64 / 1000.0,
                h.value_at_quantile(0.99) as f64 / 1000.0,
            )
        };
        let v = *self.verdicts.lock();
        let uptime = self.started.elapsed().as_secs();

        format!(
            "requests {}\nspam {}\nham {}\nrejected {}\np50_ms {:.3}\np95_ms {:.3}\np99_ms {:.3}\nuptime_s {}\n",
            v.spam + v.ham + v.rejected,
            v.spam,
            v.ham,
            v.rejected,
            p50,
            p95,
            p99,
            uptime
        )
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
