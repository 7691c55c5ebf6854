//! 投射者注册表
//!
//! 显式对象而非全局静态状态，便于测试隔离与多渲染上下文共存。
//! 单一渲染线程访问；剔除进行期间不得修改同一注册表（调用方义务）。

use crate::caster::{CasterId, ShadowCaster};
use std::sync::Arc;

/// 注册表条目
struct RegisteredCaster {
    id: CasterId,
    caster: Arc<dyn ShadowCaster>,
}

/// 投射者注册表
///
/// 以引用身份（`Arc::ptr_eq`）保证唯一性；id 由单调递增计数器分配，
/// 即使注销后也永不复用。
pub struct CasterRegistry {
    entries: Vec<RegisteredCaster>,
    next_id: u32,
}

impl Default for CasterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CasterRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }

    /// 注册投射者并返回其 id（幂等）
    ///
    /// 已注册的投射者保持原有 id 不变；新投射者分配下一个 id。
    pub fn register(&mut self, caster: &Arc<dyn ShadowCaster>) -> CasterId {
        if let Some(entry) = self
            .entries
            .iter()
            .find(|entry| Arc::ptr_eq(&entry.caster, caster))
        {
            return entry.id;
        }

        let id = CasterId(self.next_id);
        self.next_id += 1;
        self.entries.push(RegisteredCaster {
            id,
            caster: Arc::clone(caster),
        });
        id
    }

    /// 注销投射者
    ///
    /// 不存在时静默返回，不算错误。
    pub fn unregister(&mut self, caster: &Arc<dyn ShadowCaster>) {
        self.entries
            .retain(|entry| !Arc::ptr_eq(&entry.caster, caster));
    }

    /// 查询已注册投射者的 id
    pub fn id_of(&self, caster: &Arc<dyn ShadowCaster>) -> Option<CasterId> {
        self.entries
            .iter()
            .find(|entry| Arc::ptr_eq(&entry.caster, caster))
            .map(|entry| entry.id)
    }

    /// 已注册投射者数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 注册表是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 遍历所有已注册投射者
    pub fn iter(&self) -> impl Iterator<Item = (CasterId, &Arc<dyn ShadowCaster>)> + '_ {
        self.entries.iter().map(|entry| (entry.id, &entry.caster))
    }
}
