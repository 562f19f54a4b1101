//! 检测结果更新工具
//! 负责按名称去重（保留置信度更高者，同档位优先带版本者）与按置信度排序

use std::collections::HashMap;

use crate::rule::model::DetectedTechnology;

/// 检测结果更新工具
pub struct DetectionUpdater;

impl DetectionUpdater {
    /// 按名称去重
    /// 保留位置为该名称首次出现的位置，内容为胜出的条目
    pub fn dedup(detected: Vec<DetectedTechnology>) -> Vec<DetectedTechnology> {
        let mut index_by_name: HashMap<String, usize> = HashMap::with_capacity(detected.len());
        let mut merged: Vec<DetectedTechnology> = Vec::with_capacity(detected.len());

        for tech in detected {
            match index_by_name.get(&tech.name) {
                Some(&idx) => {
                    if Self::should_replace(&merged[idx], &tech) {
                        merged[idx] = tech;
                    }
                }
                None => {
                    index_by_name.insert(tech.name.clone(), merged.len());
                    merged.push(tech);
                }
            }
        }

        merged
    }

    /// 候选条目是否应替换已有条目
    fn should_replace(existing: &DetectedTechnology, candidate: &DetectedTechnology) -> bool {
        if candidate.confidence.is_better_than(&existing.confidence) {
            return true;
        }
        candidate.confidence == existing.confidence
            && existing.version.is_none()
            && candidate.version.is_some()
    }

    /// 按置信度稳定排序：high → medium → low，同档位保持插入顺序
    pub fn sort_by_confidence(detected: &mut [DetectedTechnology]) {
        detected.sort_by_key(|tech| tech.confidence.rank());
    }
}
