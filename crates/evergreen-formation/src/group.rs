//! Uniform view over the two kinds of formation group

use crate::foliage::FoliageGroup;
use crate::ornament::OrnamentGroup;
use crate::transition::TransitionProgress;
use evergreen_runtime::FormationState;
use serde::Serialize;

/// How a group reaches the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderStyle {
    /// GPU-modulated point sprites
    Point,
    /// Host-composed instance transforms
    InstancedRigid,
}

/// One independently animated group
pub enum FormationGroup {
    Point(FoliageGroup),
    InstancedRigid(OrnamentGroup),
}

impl FormationGroup {
    pub fn style(&self) -> RenderStyle {
        match self {
            FormationGroup::Point(_) => RenderStyle::Point,
            FormationGroup::InstancedRigid(_) => RenderStyle::InstancedRigid,
        }
    }

    pub fn update(&mut self, dt: f32, state: FormationState) {
        match self {
            FormationGroup::Point(group) => group.update(dt, state),
            FormationGroup::InstancedRigid(group) => group.update(dt, state),
        }
    }

    pub fn count(&self) -> usize {
        match self {
            FormationGroup::Point(group) => group.count(),
            FormationGroup::InstancedRigid(group) => group.count(),
        }
    }

    pub fn progress(&self) -> &TransitionProgress {
        match self {
            FormationGroup::Point(group) => group.progress(),
            FormationGroup::InstancedRigid(group) => group.progress(),
        }
    }

    pub fn elapsed(&self) -> f32 {
        match self {
            FormationGroup::Point(group) => group.elapsed(),
            FormationGroup::InstancedRigid(group) => group.elapsed(),
        }
    }

    pub fn label(&self) -> String {
        match self {
            FormationGroup::Point(_) => "foliage".to_string(),
            FormationGroup::InstancedRigid(group) => group.label(),
        }
    }

    pub fn snapshot(&self) -> GroupSnapshot {
        let progress = self.progress();
        GroupSnapshot {
            label: self.label(),
            style: self.style(),
            count: self.count(),
            elapsed: self.elapsed(),
            progress: progress.current(),
            target: progress.target(),
            settled: progress.is_settled(),
        }
    }
}

/// Point-in-time summary of a group, for traces and logs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSnapshot {
    pub label: String,
    pub style: RenderStyle,
    pub count: usize,
    pub elapsed: f32,
    pub progress: f32,
    pub target: f32,
    pub settled: bool,
}
