//! Rendering statistics.

use alloc::{format, string::String};
use core::fmt::{self, Display, Formatter};
use core::ops::AddAssign;
use core::time::Duration;
#[cfg(feature = "std")]
use std::time::Instant;

//
// Types
//

/// Collects and accumulates rendering statistics and performance data.
#[derive(Clone, Debug, Default)]
pub struct Stats {
    /// Time spent rendering.
    pub time: Duration,
    /// Number of render calls issued.
    pub calls: usize,

    /// Faces submitted and faces rasterized.
    pub faces: Throughput,
    /// Samples covered and samples that passed the depth test.
    pub frags: Throughput,
    /// Candidate texels examined and texels written by the baker.
    pub texels: Throughput,

    /// Number of faces skipped as degenerate.
    pub degenerate: usize,
    /// Number of texels claimed by more than one face.
    pub collisions: usize,

    #[cfg(feature = "std")]
    pub(crate) start: Option<Instant>,
}

/// Average rates of the counters of a [`Stats`], per second.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Rates {
    /// Render calls per second.
    pub calls: f64,
    pub faces: Throughput,
    pub frags: Throughput,
    pub texels: Throughput,
}

/// Counts of items in and out of a processing stage.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Throughput {
    // Count of items submitted.
    pub i: usize,
    // Count of items output.
    pub o: usize,
}

//
// Impls
//

impl Stats {
    /// Creates a new zeroed `Stats` instance.
    pub fn new() -> Self {
        Self::default()
    }
    /// Creates a `Stats` instance that records the time of its creation.
    ///
    /// Call [`finish`][Self::finish] to write the elapsed time to `self.time`.
    /// Useful for timing render calls.
    ///
    /// Equivalent to [`Stats::new`] if the `std` feature is not enabled.
    pub fn start() -> Self {
        Self {
            #[cfg(feature = "std")]
            start: Some(Instant::now()),
            ..Self::default()
        }
    }

    /// Stops the timer and records the elapsed time to `self.time`.
    ///
    /// No-op if the timer was not running. This method is also no-op unless
    /// the `std` feature is enabled.
    pub fn finish(self) -> Self {
        Self {
            #[cfg(feature = "std")]
            time: self
                .start
                .map(|st| st.elapsed())
                .unwrap_or(self.time),
            #[cfg(feature = "std")]
            start: None,
            ..self
        }
    }

    /// Returns the average rates in items per second.
    ///
    /// A zero `time` is taken to be one second.
    pub fn per_sec(&self) -> Rates {
        let secs = if self.time.is_zero() {
            1.0
        } else {
            self.time.as_secs_f64()
        };
        let [faces, frags, texels] =
            self.throughput().map(|stat| stat.per_sec(secs));
        Rates {
            calls: self.calls as f64 / secs,
            faces,
            frags,
            texels,
        }
    }

    fn throughput(&self) -> [Throughput; 3] {
        [self.faces, self.frags, self.texels]
    }
}

impl Throughput {
    fn per_sec(&self, secs: f64) -> Self {
        Self {
            i: (self.i as f64 / secs) as usize,
            o: (self.o as f64 / secs) as usize,
        }
    }
}

impl Display for Stats {
    #[inline(never)]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let w = f.width().unwrap_or(16);
        let per_s = self.per_sec();
        let sep = |f: &mut Formatter<'_>| {
            writeln!(f, "{empty:─>l$}┼{empty:─>r$}", empty = "", l = w + 13, r = w + 1)
        };

        writeln!(f, " {:10} {:>w$} │ {:>w$}", "STATS", "TOTAL", "PER SEC")?;
        sep(f)?;
        writeln!(f, " {:10} {:>w$} │", "time", human_time(self.time))?;
        writeln!(f, " {:10} {:>w$} │ {:>w$.1}", "calls", self.calls, per_s.calls)?;
        sep(f)?;

        let labels = ["faces", "frags", "texels"];
        for (i, lbl) in labels.iter().enumerate() {
            let tot = self.throughput()[i];
            let per_s = [per_s.faces, per_s.frags, per_s.texels][i];
            if f.alternate() {
                writeln!(f, " {lbl:10} {tot:#w$} │ {per_s:#w$}")?;
            } else {
                writeln!(f, " {lbl:10} {tot:w$} │ {per_s:w$}")?;
            }
        }
        sep(f)?;
        writeln!(f, " {:10} {:>w$} │", "degenerate", self.degenerate)?;
        writeln!(f, " {:10} {:>w$} │", "collisions", self.collisions)
    }
}

impl Display for Throughput {
    #[inline(never)]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let &Self { i, o } = self;
        let w = f.width().unwrap_or(10);
        if f.alternate() {
            if i == 0 {
                write!(f, "{:>w$}", "--")
            } else {
                let pct = 100.0 * o as f64 / i as f64;
                write!(f, "{pct:>w$.1}%", w = w - 1)
            }
        } else {
            let io = format!("{} / {}", human_num(i), human_num(o));
            write!(f, "{io:>w$}")
        }
    }
}

impl AddAssign for Stats {
    /// Appends the stats of `other` to `self`.
    fn add_assign(&mut self, other: Self) {
        self.time += other.time;
        self.calls += other.calls;
        self.faces += other.faces;
        self.frags += other.frags;
        self.texels += other.texels;
        self.degenerate += other.degenerate;
        self.collisions += other.collisions;
    }
}

impl AddAssign for Throughput {
    fn add_assign(&mut self, rhs: Self) {
        self.i += rhs.i;
        self.o += rhs.o;
    }
}

#[inline(never)]
fn human_num(n: usize) -> String {
    if n < 1_000 {
        format!("{n:5}")
    } else if n < 100_000 {
        format!("{:4.1}k", n as f64 / 1_000.)
    } else if n < 1_000_000 {
        format!("{:4}k", n / 1_000)
    } else if n < 100_000_000 {
        format!("{:4.1}M", n as f64 / 1_000_000.)
    } else if n < 1_000_000_000 {
        format!("{:4}M", n / 1_000_000)
    } else {
        format!("{:4.1}G", n as f64 / 1_000_000_000.)
    }
}

#[inline(never)]
fn human_time(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 1e-3 {
        format!("{:4.1}μs", secs * 1_000_000.)
    } else if secs < 1.0 {
        format!("{:4.1}ms", secs * 1_000.)
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let mins = d.as_secs() / 60;
        let rem = d.as_secs() % 60;
        format!("{mins}min {rem:02}s")
    }
}
