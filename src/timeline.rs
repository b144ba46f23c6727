//! 脚本化时间线
//!
//! 从 JSON 描述一组定时器和若干次时钟推进，在 [`TimeTestContext`] 中执行，
//! 记录每个定时器触发时两只时钟的读数。`timeline` 二进制基于此实现。

use crate::config::{ConfigError, HarnessConfig};
use crate::harness::TimeTestContext;
use crate::sim::{Handler, HandlerResult, LoopError, SimDuration, TimerLoop};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum TimelineError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid timeline JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("timer {label:?}: {reason}")]
    InvalidTimer { label: String, reason: &'static str },
    #[error("advance step #{index}: {reason}")]
    InvalidStep { index: usize, reason: &'static str },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineSpec {
    #[serde(default)]
    pub config: HarnessConfig,
    #[serde(default)]
    pub timers: Vec<TimerSpec>,
    #[serde(default)]
    pub advance: Vec<AdvanceSpec>,
}

/// 相对稳定时钟起点调度的定时器
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerSpec {
    pub label: String,
    pub after_us: i64,
    /// 触发时回调返回错误
    #[serde(default)]
    pub fail: bool,
    /// 触发后按此间隔重新调度（例如重传定时器）
    #[serde(default)]
    pub every_us: Option<i64>,
    /// 首次触发之后的重复次数
    #[serde(default)]
    pub repeat: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum AdvanceSpec {
    Total { tick_us: i64, total_us: i64 },
    Ticks { tick_us: i64, ticks: u64 },
}

/// 一次定时器触发记录
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FiredTimer {
    pub label: String,
    /// 该定时器第几次触发（从 0 开始）
    pub shot: u32,
    pub steady_ns: i64,
    pub wall_ns: i64,
}

#[derive(Debug)]
pub struct TimelineRun {
    pub fired: Vec<FiredTimer>,
    /// 稳定时钟相对起点实际前进的时长
    pub steady_elapsed: SimDuration,
    /// 中止推进的回调错误
    pub failure: Option<LoopError>,
}

impl TimelineSpec {
    pub fn from_json_str(s: &str) -> Result<Self, TimelineError> {
        let spec: TimelineSpec = serde_json::from_str(s)?;
        spec.validate()?;
        Ok(spec)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TimelineError> {
        let path = path.as_ref();
        let s = fs::read_to_string(path).map_err(|source| TimelineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&s)
    }

    pub fn validate(&self) -> Result<(), TimelineError> {
        self.config.validate()?;
        for t in &self.timers {
            if t.after_us < 0 {
                return Err(TimelineError::InvalidTimer {
                    label: t.label.clone(),
                    reason: "after_us must not be negative",
                });
            }
            if t.repeat > 0 && !t.every_us.is_some_and(|e| e > 0) {
                return Err(TimelineError::InvalidTimer {
                    label: t.label.clone(),
                    reason: "repeat needs a positive every_us",
                });
            }
        }
        // 所有推进步累计后，两只时钟都必须仍在范围内
        let mut elapsed = SimDuration::ZERO;
        for (index, step) in self.advance.iter().enumerate() {
            let invalid = |reason| TimelineError::InvalidStep { index, reason };
            let (tick_us, total) = match *step {
                AdvanceSpec::Total { tick_us, total_us } => (tick_us, micros(total_us)),
                AdvanceSpec::Ticks { tick_us, ticks } => (
                    tick_us,
                    micros(tick_us).and_then(|tick| tick.checked_mul(ticks)),
                ),
            };
            if tick_us <= 0 {
                return Err(invalid("tick_us must be positive"));
            }
            if micros(tick_us).is_none() {
                return Err(invalid("tick_us is out of range"));
            }
            let total = total
                .filter(|t| !t.is_negative())
                .ok_or_else(|| invalid("total must be a non-negative, representable duration"))?;
            elapsed = elapsed
                .checked_add(total)
                .filter(|e| {
                    self.config.steady_start.checked_add(*e).is_some()
                        && self.config.wall_start.checked_add(*e).is_some()
                })
                .ok_or_else(|| invalid("timeline runs past the clock range"))?;
        }
        Ok(())
    }
}

/// 微秒转纳秒，溢出时返回 None
fn micros(us: i64) -> Option<SimDuration> {
    us.checked_mul(1_000).map(SimDuration)
}

type FireLog = Rc<RefCell<Vec<FiredTimer>>>;

struct TimelineTimer {
    label: String,
    fail: bool,
    every: Option<SimDuration>,
    left: u32,
    shot: u32,
    log: FireLog,
}

impl Handler for TimelineTimer {
    fn fire(self: Box<Self>, lp: &mut TimerLoop) -> HandlerResult {
        let TimelineTimer {
            label,
            fail,
            every,
            left,
            shot,
            log,
        } = *self;

        let steady_ns = lp.clocks().steady_now().as_nanos();
        let wall_ns = lp.clocks().wall_now().as_nanos();
        debug!(label = %label, shot, steady_ns, "定时器触发");
        log.borrow_mut().push(FiredTimer {
            label: label.clone(),
            shot,
            steady_ns,
            wall_ns,
        });

        if fail {
            return Err(format!("timer {label} failed at shot {shot}").into());
        }
        if let (Some(every), true) = (every, left > 0) {
            lp.schedule_after(
                every,
                TimelineTimer {
                    label,
                    fail,
                    every: Some(every),
                    left: left - 1,
                    shot: shot + 1,
                    log,
                },
            );
        }
        Ok(())
    }
}

/// 执行时间线。回调失败不算错误：推进就此停止，失败记录在返回值里。
#[tracing::instrument(skip(spec), fields(timers = spec.timers.len(), steps = spec.advance.len()))]
pub fn run_timeline(spec: &TimelineSpec) -> Result<TimelineRun, TimelineError> {
    spec.validate()?;

    let mut ctx = TimeTestContext::with_config(spec.config.clone());
    let log: FireLog = Rc::default();
    let start = ctx.steady_clock().now();

    for t in &spec.timers {
        ctx.event_loop().schedule_after(
            SimDuration::from_micros(t.after_us),
            TimelineTimer {
                label: t.label.clone(),
                fail: t.fail,
                every: t.every_us.map(SimDuration::from_micros),
                left: t.repeat,
                shot: 0,
                log: Rc::clone(&log),
            },
        );
    }

    let mut failure = None;
    for step in &spec.advance {
        let res = match *step {
            AdvanceSpec::Total { tick_us, total_us } => ctx.advance_clocks_for(
                SimDuration::from_micros(tick_us),
                SimDuration::from_micros(total_us),
            ),
            AdvanceSpec::Ticks { tick_us, ticks } => {
                ctx.advance_clocks(SimDuration::from_micros(tick_us), ticks)
            }
        };
        if let Err(e) = res {
            info!(error = %e, "回调失败，停止推进");
            failure = Some(e);
            break;
        }
    }

    let steady_elapsed = ctx.steady_clock().now() - start;
    let fired = log.borrow().clone();
    info!(fired = fired.len(), ?steady_elapsed, "时间线执行完成");
    Ok(TimelineRun {
        fired,
        steady_elapsed,
        failure,
    })
}
