//! 单线程事件循环
//!
//! 维护按到期时间排序的回调队列。时间不由循环自己推进：
//! 每次 `run_ready_work` 都从注入的 [`ClockContext`] 读取稳定时钟，
//! 只执行已经到期的回调，从不等待。

use super::error::LoopError;
use super::handler::Handler;
use super::scheduled_event::{ScheduledTimer, TimerId};
use super::time::{SimDuration, SimTime};
use crate::clock::ClockContext;
use std::collections::{BinaryHeap, HashSet};
use tracing::{debug, trace};

// 已取消条目少于此数时不清理
const COMPACT_MIN_DEAD: usize = 64;

/// 单线程协作式事件循环
pub struct TimerLoop {
    clocks: ClockContext,
    next_id: u64,
    stopped: bool,
    q: BinaryHeap<ScheduledTimer>,
    // 仍在排队且未被取消的定时器
    live: HashSet<TimerId>,
}

impl TimerLoop {
    pub fn new(clocks: ClockContext) -> Self {
        Self {
            clocks,
            next_id: 0,
            stopped: false,
            q: BinaryHeap::new(),
            live: HashSet::new(),
        }
    }

    /// 循环读取时间所用的时钟上下文
    pub fn clocks(&self) -> &ClockContext {
        &self.clocks
    }

    /// 投递一个立即就绪的回调
    pub fn post<H: Handler>(&mut self, handler: H) -> TimerId {
        let now = self.clocks.steady_now();
        self.push(now, Box::new(handler))
    }

    /// 调度回调在稳定时钟到达 `at` 时执行
    #[tracing::instrument(skip(self, handler), fields(handler_type = std::any::type_name::<H>()))]
    pub fn schedule_at<H: Handler>(&mut self, at: SimTime, handler: H) -> TimerId {
        self.push(at, Box::new(handler))
    }

    /// 调度回调在 `delay` 之后执行
    pub fn schedule_after<H: Handler>(&mut self, delay: SimDuration, handler: H) -> TimerId {
        let at = self.clocks.steady_now() + delay;
        self.schedule_at(at, handler)
    }

    fn push(&mut self, at: SimTime, handler: Box<dyn Handler>) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        trace!(?id, ?at, "回调入队");

        self.live.insert(id);
        self.q.push(ScheduledTimer { at, id, handler });

        debug!(queue_size = self.live.len(), "回调已加入队列");
        id
    }

    /// 取消尚未执行的定时器；已执行或未知的返回 false。
    ///
    /// 被取消的条目先留在堆里，执行到时跳过；已取消条目多于存活条目时整体清理一次。
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let removed = self.live.remove(&id);
        if removed {
            debug!(?id, "定时器已取消");
            self.compact_if_needed();
        }
        removed
    }

    fn compact_if_needed(&mut self) {
        let dead = self.q.len() - self.live.len();
        if dead < COMPACT_MIN_DEAD || dead <= self.live.len() {
            return;
        }
        let live = &self.live;
        self.q.retain(|t| live.contains(&t.id));
        debug!(dropped = dead, queue_size = self.q.len(), "清理已取消的定时器");
    }

    /// 堆中的条目数，包括尚未清理的已取消条目
    pub(crate) fn queued_entries(&self) -> usize {
        self.q.len()
    }

    /// 排队中（未取消）的回调数
    pub fn pending(&self) -> usize {
        self.live.len()
    }

    /// 停止循环：当前这轮执行在本回调返回后结束，剩余回调保持排队。
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// 让已停止的循环可以再次运行
    pub fn reset_for_reuse(&mut self) {
        self.stopped = false;
    }

    /// 执行所有已到期的回调后返回，不等待新的回调。
    ///
    /// 本轮执行期间新到期的回调（例如回调里投递的“立即”回调）也在本轮执行。
    /// 返回执行过的回调数；遇到第一个失败的回调即返回错误。
    #[tracing::instrument(skip(self))]
    pub fn run_ready_work(&mut self) -> Result<usize, LoopError> {
        let mut ran = 0;
        while !self.stopped {
            let now = self.clocks.steady_now();
            let Some(top) = self.q.peek() else {
                break;
            };
            if top.at > now {
                break;
            }
            let ScheduledTimer { at, id, handler } = self.q.pop().expect("peek then pop");
            if !self.live.remove(&id) {
                trace!(?id, "跳过已取消的定时器");
                continue;
            }

            ran += 1;
            trace!(?id, ?at, ?now, remaining_queue = self.live.len(), "执行回调");
            handler
                .fire(self)
                .map_err(|source| LoopError::Handler { timer: id, at, source })?;
        }

        debug!(ran, stopped = self.stopped, pending = self.live.len(), "本轮执行结束");
        Ok(ran)
    }
}
