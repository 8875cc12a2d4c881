use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    Completed,
    Active,
    Pending,
}

/// State of the step at `index` when `active` is the current step.
pub fn step_state(index: usize, active: usize) -> StepState {
    match index.cmp(&active) {
        std::cmp::Ordering::Less => StepState::Completed,
        std::cmp::Ordering::Equal => StepState::Active,
        std::cmp::Ordering::Greater => StepState::Pending,
    }
}

pub(crate) fn set_progress(
    page: &mut Page,
    steps: &[NodeId],
    active: usize,
    config: &StepsConfig,
) -> Result<()> {
    for (index, step) in steps.iter().enumerate() {
        let state = step_state(index, active);
        page.dom
            .class_toggle_force(*step, &config.active_class, state == StepState::Active)?;
        page.dom.class_toggle_force(
            *step,
            &config.completed_class,
            state == StepState::Completed,
        )?;
    }
    Ok(())
}

/// Fills the donation steps as the reader scrolls through them. The first
/// step starts active regardless of visibility.
pub fn install(page: &mut Page, config: &StepsConfig) -> Result<bool> {
    let steps = Rc::<[NodeId]>::from(page.select_all(&config.selector)?);
    if steps.is_empty() {
        return Ok(false);
    }

    let observed = Rc::clone(&steps);
    let classes = config.clone();
    let observer = page.observe_intersections(
        ObserverOptions::with_threshold(config.threshold),
        move |page, entries, _| {
            for entry in entries.iter().filter(|entry| entry.is_intersecting) {
                if let Some(index) = observed.iter().position(|step| *step == entry.target) {
                    set_progress(page, &observed, index, &classes)?;
                }
            }
            Ok(())
        },
    );
    for step in steps.iter() {
        page.observe(observer, *step)?;
    }

    set_progress(page, &steps, 0, config)?;
    Ok(true)
}
