//! 有界优先级选择缓冲
//!
//! 固定容量的 top-K 选择结构：以任意顺序接收 (优先级, 负载) 条目，
//! 只保留优先级最高的 `capacity` 个，其余静默丢弃。这不是完整排序——
//! 任何时刻存活条目数都不超过容量。
//!
//! 内部是手写二叉小顶堆，按 (优先级升序, 到达序号降序) 排列，堆顶即淘汰
//! 候选，单次 [`try_append`](PriorityBuffer::try_append) 为 O(log capacity)。
//! 相同优先级时先到者胜出（后到者先被淘汰、且不能挤掉同优先级条目）。

use std::cmp::Ordering;
use std::ops::Index;

/// [`PriorityBuffer::try_append`] 的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// 已保留（容量未满，直接插入）
    Accepted,
    /// 已保留（淘汰了当前最低优先级条目）
    Replaced,
    /// 已拒绝（优先级不严格高于当前保留的最低值）
    Rejected,
}

impl AppendOutcome {
    /// 条目是否被保留
    pub fn is_accepted(&self) -> bool {
        !matches!(self, AppendOutcome::Rejected)
    }
}

struct Entry<P, T> {
    priority: P,
    /// 到达序号；相同优先级时序号大（后到）的先被淘汰
    seq: u64,
    payload: T,
}

/// 有界优先级选择缓冲
///
/// 保留条目的下标顺序是堆序（未定义顺序），调用方不得假设按优先级排列。
pub struct PriorityBuffer<P, T> {
    entries: Vec<Entry<P, T>>,
    capacity: usize,
    next_seq: u64,
}

impl<P, T> Default for PriorityBuffer<P, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, T> PriorityBuffer<P, T> {
    /// 创建容量为 0 的空缓冲；使用前需调用 [`reset`](Self::reset)
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            capacity: 0,
            next_seq: 0,
        }
    }

    /// 清空所有条目并设置本轮容量
    ///
    /// 每轮剔除开始时必须恰好调用一次，之后才能追加条目。
    pub fn reset(&mut self, capacity: usize) {
        self.entries.clear();
        self.entries.reserve(capacity);
        self.capacity = capacity;
        self.next_seq = 0;
    }

    /// 当前保留的条目数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否没有保留任何条目
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 本轮容量
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 读取保留条目的负载；越界返回 `None`
    pub fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index).map(|entry| &entry.payload)
    }
}

impl<P: PartialOrd + Copy, T> PriorityBuffer<P, T> {
    /// 提交一个 (优先级, 负载) 条目
    ///
    /// - 容量未满：无条件插入，返回 [`AppendOutcome::Accepted`]
    /// - 已满且优先级严格高于保留的最低值：淘汰最低条目（同优先级时淘汰
    ///   最后到达者），返回 [`AppendOutcome::Replaced`]
    /// - 其余情况：静默拒绝，返回 [`AppendOutcome::Rejected`]（超出阴影
    ///   预算是预期结果，不是错误）
    ///
    /// 容量为 0 时所有条目都被拒绝。
    pub fn try_append(&mut self, priority: P, payload: T) -> AppendOutcome {
        if self.capacity == 0 {
            return AppendOutcome::Rejected;
        }

        let seq = self.next_seq;
        self.next_seq += 1;

        if self.entries.len() < self.capacity {
            self.entries.push(Entry {
                priority,
                seq,
                payload,
            });
            self.sift_up(self.entries.len() - 1);
            return AppendOutcome::Accepted;
        }

        // 已满：只有严格高于堆顶（当前最低优先级）才替换
        let strictly_greater = matches!(
            priority.partial_cmp(&self.entries[0].priority),
            Some(Ordering::Greater)
        );
        if !strictly_greater {
            return AppendOutcome::Rejected;
        }

        self.entries[0] = Entry {
            priority,
            seq,
            payload,
        };
        self.sift_down(0);
        AppendOutcome::Replaced
    }

    /// 读取保留条目的优先级；越界返回 `None`
    pub fn priority(&self, index: usize) -> Option<P> {
        self.entries.get(index).map(|entry| entry.priority)
    }

    /// 遍历保留条目（堆序，无顺序保证）
    pub fn iter(&self) -> impl Iterator<Item = (P, &T)> + '_ {
        self.entries
            .iter()
            .map(|entry| (entry.priority, &entry.payload))
    }

    /// `a` 是否比 `b` 更先被淘汰（优先级更低；相同优先级时到达更晚）
    fn evicts_first(a: &Entry<P, T>, b: &Entry<P, T>) -> bool {
        match a.priority.partial_cmp(&b.priority) {
            Some(Ordering::Less) => true,
            Some(Ordering::Greater) => false,
            // 相等或不可比较（NaN）时按到达顺序
            _ => a.seq > b.seq,
        }
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if Self::evicts_first(&self.entries[index], &self.entries[parent]) {
                self.entries.swap(index, parent);
                index = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.entries.len();
        loop {
            let left = index * 2 + 1;
            let right = left + 1;
            let mut first = index;

            if left < len && Self::evicts_first(&self.entries[left], &self.entries[first]) {
                first = left;
            }
            if right < len && Self::evicts_first(&self.entries[right], &self.entries[first]) {
                first = right;
            }
            if first == index {
                break;
            }
            self.entries.swap(index, first);
            index = first;
        }
    }
}

impl<P, T> Index<usize> for PriorityBuffer<P, T> {
    type Output = T;

    /// 越界下标是调用方错误，直接 panic
    fn index(&self, index: usize) -> &T {
        &self.entries[index].payload
    }
}
