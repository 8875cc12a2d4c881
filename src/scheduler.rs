use super::*;

pub type TimerId = i64;
pub type FrameId = i64;

pub(crate) type TaskCallback = Box<dyn FnOnce(&mut Page) -> Result<()>>;

/// Animation frames run at 60 Hz; tick `k` fires at `round(k * 1000 / 60)` ms.
pub(crate) const FRAMES_PER_SECOND: i64 = 60;

pub(crate) struct ScheduledTask {
    pub(crate) id: TimerId,
    pub(crate) due_at: i64,
    pub(crate) order: i64,
    pub(crate) callback: TaskCallback,
}

impl fmt::Debug for ScheduledTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScheduledTask")
            .field("id", &self.id)
            .field("due_at", &self.due_at)
            .field("order", &self.order)
            .finish_non_exhaustive()
    }
}

pub(crate) struct ScheduledFrame {
    pub(crate) id: FrameId,
    pub(crate) tick: i64,
    pub(crate) order: i64,
    pub(crate) callback: TaskCallback,
}

impl fmt::Debug for ScheduledFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScheduledFrame")
            .field("id", &self.id)
            .field("tick", &self.tick)
            .field("order", &self.order)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTimer {
    pub id: TimerId,
    pub due_at: i64,
    pub order: i64,
}

#[derive(Debug)]
pub(crate) struct SchedulerState {
    pub(crate) task_queue: Vec<ScheduledTask>,
    pub(crate) frame_queue: Vec<ScheduledFrame>,
    pub(crate) now_ms: i64,
    pub(crate) timer_step_limit: usize,
    pub(crate) next_timer_id: i64,
    pub(crate) next_frame_id: i64,
    pub(crate) next_task_order: i64,
}

impl Default for SchedulerState {
    fn default() -> Self {
        Self {
            task_queue: Vec::new(),
            frame_queue: Vec::new(),
            now_ms: 0,
            timer_step_limit: 10_000,
            next_timer_id: 1,
            next_frame_id: 1,
            next_task_order: 0,
        }
    }
}

impl SchedulerState {
    pub(crate) fn allocate_timer_id(&mut self) -> TimerId {
        let id = self.next_timer_id;
        self.next_timer_id += 1;
        id
    }

    pub(crate) fn allocate_frame_id(&mut self) -> FrameId {
        let id = self.next_frame_id;
        self.next_frame_id += 1;
        id
    }

    pub(crate) fn allocate_task_order(&mut self) -> i64 {
        let order = self.next_task_order;
        self.next_task_order += 1;
        order
    }

    fn next_timer(&self, due_limit: Option<i64>) -> Option<(usize, i64)> {
        self.task_queue
            .iter()
            .enumerate()
            .filter(|(_, task)| due_limit.is_none_or(|limit| task.due_at <= limit))
            .min_by_key(|(_, task)| (task.due_at, task.order))
            .map(|(idx, task)| (idx, task.due_at))
    }

    fn next_frame_tick(&self, due_limit: Option<i64>) -> Option<(i64, i64)> {
        self.frame_queue
            .iter()
            .map(|frame| frame.tick)
            .min()
            .map(|tick| (tick, frame_time(tick)))
            .filter(|(_, at)| due_limit.is_none_or(|limit| *at <= limit))
    }

    fn next_work(&self, due_limit: Option<i64>) -> Option<NextWork> {
        match (self.next_timer(due_limit), self.next_frame_tick(due_limit)) {
            (None, None) => None,
            (Some((idx, due_at)), None) => Some(NextWork::Timer(idx, due_at)),
            (None, Some((tick, at))) => Some(NextWork::Frame(tick, at)),
            // Tasks run before rendering at the same instant.
            (Some((idx, due_at)), Some((tick, at))) => {
                if due_at <= at {
                    Some(NextWork::Timer(idx, due_at))
                } else {
                    Some(NextWork::Frame(tick, at))
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum NextWork {
    Timer(usize, i64),
    Frame(i64, i64),
}

pub(crate) fn frame_time(tick: i64) -> i64 {
    let at = (i128::from(tick) * 1000 + i128::from(FRAMES_PER_SECOND / 2))
        / i128::from(FRAMES_PER_SECOND);
    i64::try_from(at).unwrap_or(i64::MAX)
}

/// First frame tick strictly after `now_ms`.
pub(crate) fn next_tick_after(now_ms: i64) -> i64 {
    let mut tick = now_ms.max(0) / 1000 * FRAMES_PER_SECOND;
    // The grid saturates at the end of the clock.
    while frame_time(tick) <= now_ms && frame_time(tick) < i64::MAX {
        tick += 1;
    }
    tick
}

impl Page {
    pub fn now_ms(&self) -> i64 {
        self.scheduler.now_ms
    }

    /// `setTimeout`: runs `callback` once, `delay_ms` after now.
    pub fn set_timeout(
        &mut self,
        delay_ms: i64,
        callback: impl FnOnce(&mut Page) -> Result<()> + 'static,
    ) -> TimerId {
        let id = self.scheduler.allocate_timer_id();
        let due_at = self.scheduler.now_ms.saturating_add(delay_ms.max(0));
        let order = self.scheduler.allocate_task_order();
        self.scheduler.task_queue.push(ScheduledTask {
            id,
            due_at,
            order,
            callback: Box::new(callback),
        });
        self.trace_timer_line(format!(
            "[timer] schedule id={id} due_at={due_at} delay_ms={delay_ms}"
        ));
        id
    }

    pub fn clear_timeout(&mut self, timer_id: TimerId) -> bool {
        let before = self.scheduler.task_queue.len();
        self.scheduler.task_queue.retain(|task| task.id != timer_id);
        before != self.scheduler.task_queue.len()
    }

    /// `requestAnimationFrame`: runs `callback` on the next frame tick.
    pub fn request_animation_frame(
        &mut self,
        callback: impl FnOnce(&mut Page) -> Result<()> + 'static,
    ) -> FrameId {
        let id = self.scheduler.allocate_frame_id();
        let tick = next_tick_after(self.scheduler.now_ms);
        let order = self.scheduler.allocate_task_order();
        self.scheduler.frame_queue.push(ScheduledFrame {
            id,
            tick,
            order,
            callback: Box::new(callback),
        });
        id
    }

    pub fn cancel_animation_frame(&mut self, frame_id: FrameId) -> bool {
        let before = self.scheduler.frame_queue.len();
        self.scheduler.frame_queue.retain(|frame| frame.id != frame_id);
        before != self.scheduler.frame_queue.len()
    }

    pub fn pending_timers(&self) -> Vec<PendingTimer> {
        let mut timers = self
            .scheduler
            .task_queue
            .iter()
            .map(|task| PendingTimer {
                id: task.id,
                due_at: task.due_at,
                order: task.order,
            })
            .collect::<Vec<_>>();
        timers.sort_by_key(|timer| (timer.due_at, timer.order));
        timers
    }

    pub fn pending_animation_frames(&self) -> usize {
        self.scheduler.frame_queue.len()
    }

    pub fn set_timer_step_limit(&mut self, max_steps: usize) -> Result<()> {
        if max_steps == 0 {
            return Err(Error::Runtime(
                "set_timer_step_limit requires at least 1 step".into(),
            ));
        }
        self.scheduler.timer_step_limit = max_steps;
        Ok(())
    }

    pub fn advance_time(&mut self, delta_ms: i64) -> Result<()> {
        if delta_ms < 0 {
            return Err(Error::Runtime(
                "advance_time requires non-negative milliseconds".into(),
            ));
        }
        let target = self.scheduler.now_ms.saturating_add(delta_ms);
        self.advance_time_to(target)
    }

    pub fn advance_time_to(&mut self, target_ms: i64) -> Result<()> {
        if target_ms < self.scheduler.now_ms {
            return Err(Error::Runtime(format!(
                "advance_time_to requires target >= now_ms (target={target_ms}, now_ms={})",
                self.scheduler.now_ms
            )));
        }
        let from = self.scheduler.now_ms;
        self.update_intersections()?;
        let ran = self.run_scheduled_work(Some(target_ms))?;
        self.scheduler.now_ms = target_ms;
        self.trace_timer_line(format!(
            "[timer] advance_to from={from} to={target_ms} ran={ran}"
        ));
        Ok(())
    }

    /// Runs timers and frames until both queues are empty, moving the clock
    /// forward as needed.
    pub fn flush(&mut self) -> Result<()> {
        let from = self.scheduler.now_ms;
        self.update_intersections()?;
        let ran = self.run_scheduled_work(None)?;
        self.trace_timer_line(format!(
            "[timer] flush from={from} to={} ran={ran}",
            self.scheduler.now_ms
        ));
        Ok(())
    }

    /// Runs the earliest timer or frame tick regardless of the clock.
    pub fn run_next_timer(&mut self) -> Result<bool> {
        let Some(next) = self.scheduler.next_work(None) else {
            return Ok(false);
        };
        self.run_work(next)?;
        Ok(true)
    }

    fn run_scheduled_work(&mut self, due_limit: Option<i64>) -> Result<usize> {
        let mut steps = 0usize;
        while let Some(next) = self.scheduler.next_work(due_limit) {
            steps += 1;
            if steps > self.scheduler.timer_step_limit {
                return Err(Error::Runtime(format!(
                    "flush exceeded max task steps: limit={}, now_ms={}, pending_timers={}, pending_frames={}",
                    self.scheduler.timer_step_limit,
                    self.scheduler.now_ms,
                    self.scheduler.task_queue.len(),
                    self.scheduler.frame_queue.len()
                )));
            }
            self.run_work(next)?;
        }
        Ok(steps)
    }

    fn run_work(&mut self, next: NextWork) -> Result<()> {
        match next {
            NextWork::Timer(idx, due_at) => {
                let task = self.scheduler.task_queue.remove(idx);
                if due_at > self.scheduler.now_ms {
                    self.scheduler.now_ms = due_at;
                }
                self.trace_timer_line(format!(
                    "[timer] run id={} due_at={} now_ms={}",
                    task.id, task.due_at, self.scheduler.now_ms
                ));
                (task.callback)(self)?;
            }
            NextWork::Frame(tick, at) => {
                if at > self.scheduler.now_ms {
                    self.scheduler.now_ms = at;
                }
                let (mut due, rest): (Vec<_>, Vec<_>) =
                    std::mem::take(&mut self.scheduler.frame_queue)
                        .into_iter()
                        .partition(|frame| frame.tick == tick);
                self.scheduler.frame_queue = rest;
                due.sort_by_key(|frame| frame.order);
                self.trace_timer_line(format!(
                    "[frame] tick={tick} at={at} callbacks={}",
                    due.len()
                ));
                for frame in due {
                    (frame.callback)(self)?;
                }
            }
        }
        self.update_intersections()
    }
}
