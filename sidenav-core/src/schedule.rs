use std::collections::BTreeMap;
use std::time::Duration;

/// Các tác vụ hoãn mà widget có thể hẹn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Task {
    /// Kiểm tra lại chế độ di động sau khi resize lắng xuống.
    ResizeSettled,
    /// Đổi icon nút thu gọn và tiêu đề vùng mở rộng.
    Indicators,
    /// Gọi hook vẽ lại icon của trang.
    IconRefresh,
    TooltipDismiss,
    RestoreState,
    FaviconPoll,
    Reinitialize,
}

/// Định danh do host cấp cho một hẹn giờ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(pub i32);

/// Năng lực hẹn giờ của host (setTimeout/setInterval trên trình duyệt).
pub trait Scheduler {
    fn schedule(&mut self, task: Task, delay: Duration, repeat: bool) -> Option<TaskHandle>;
    /// Hủy hoặc giải phóng một hẹn giờ; gọi lại trên handle đã chạy là vô hại.
    fn cancel(&mut self, handle: TaskHandle);
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    handle: TaskHandle,
    repeat: bool,
}

/// Sổ theo dõi hẹn giờ của một instance: mỗi loại tác vụ tối đa một hẹn giờ.
#[derive(Debug, Default)]
pub struct Timers {
    pending: BTreeMap<Task, Pending>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hủy hẹn giờ cũ cùng loại rồi hẹn lại (debounce).
    pub fn defer<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S, task: Task, delay: Duration) {
        self.arm(scheduler, task, delay, false);
    }

    pub fn every<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S, task: Task, period: Duration) {
        self.arm(scheduler, task, period, true);
    }

    fn arm<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S, task: Task, delay: Duration, repeat: bool) {
        self.cancel(scheduler, task);
        match scheduler.schedule(task, delay, repeat) {
            Some(handle) => {
                self.pending.insert(task, Pending { handle, repeat });
            }
            None => log::debug!("scheduler refused {task:?}"),
        }
    }

    pub fn cancel<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S, task: Task) -> bool {
        match self.pending.remove(&task) {
            Some(pending) => {
                scheduler.cancel(pending.handle);
                true
            }
            None => false,
        }
    }

    /// Ghi nhận một hẹn giờ vừa chạy. Trả về `false` nếu nó đã bị hủy (lần chạy lỗi thời).
    pub fn fired<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S, task: Task) -> bool {
        match self.pending.get(&task).copied() {
            Some(pending) if pending.repeat => true,
            Some(pending) => {
                self.pending.remove(&task);
                scheduler.cancel(pending.handle);
                true
            }
            None => false,
        }
    }

    pub fn cancel_all<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S) -> usize {
        let pending = std::mem::take(&mut self.pending);
        for entry in pending.values() {
            scheduler.cancel(entry.handle);
        }
        pending.len()
    }

    pub fn is_pending(&self, task: Task) -> bool {
        self.pending.contains_key(&task)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
