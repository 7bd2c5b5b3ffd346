//! The guided design session: a strictly linear five-step flow that
//! accumulates a [`ShedConfiguration`].
//!
//! Steps one through four advance on any single on-menu selection. The
//! add-ons step is a sub-loop: each selection narrows the remaining menu
//! until the terminal option (or a repeated selection, the duplicate guard)
//! completes the session. There are no backward transitions; abandoning a
//! session persists nothing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{AddonOption, RoofOption, SidingOption, SizeOption, StyleOption};
use crate::domain::design::ShedConfiguration;

/// Terminal option offered once at least one add-on has been chosen.
pub const FINISH_OPTION: &str = "Done, calculate price";
/// Terminal option offered while the add-on set is still empty.
pub const SKIP_ADDONS_OPTION: &str = "No thanks, calculate price";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardStep {
    #[default]
    Size,
    Style,
    Siding,
    Roof,
    Addons,
    Complete,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("`{selection}` is not an available option for the {step:?} step")]
    UnknownOption { step: WizardStep, selection: String },
    #[error("the design session is already complete")]
    SessionComplete,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// The session moved on (or stayed in the add-ons sub-loop).
    Advanced(WizardStep),
    /// The session finished; the accumulated configuration is ready to price.
    Completed(ShedConfiguration),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DesignWizard {
    step: WizardStep,
    size: Option<SizeOption>,
    style: Option<StyleOption>,
    siding: Option<SidingOption>,
    roof: Option<RoofOption>,
    addons: Vec<AddonOption>,
}

impl DesignWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// Question text presented for the current step.
    pub fn prompt(&self) -> &'static str {
        match self.step {
            WizardStep::Size => "Let's design your perfect shed! What size are you thinking?",
            WizardStep::Style => "Great choice! What style catches your eye?",
            WizardStep::Siding => "Perfect! What siding would you prefer?",
            WizardStep::Roof => "Nice! What type of roof?",
            WizardStep::Addons => {
                if self.addons.is_empty() {
                    "Almost done! Any add-ons?"
                } else {
                    "Added! Anything else?"
                }
            }
            WizardStep::Complete => "All set! Your design is priced.",
        }
    }

    /// Options selectable at the current step. In the add-ons sub-loop,
    /// already-chosen add-ons are withheld and a terminal option is appended.
    pub fn options(&self) -> Vec<&'static str> {
        match self.step {
            WizardStep::Size => SizeOption::ALL.iter().map(|o| o.label()).collect(),
            WizardStep::Style => StyleOption::ALL.iter().map(|o| o.label()).collect(),
            WizardStep::Siding => SidingOption::ALL.iter().map(|o| o.label()).collect(),
            WizardStep::Roof => RoofOption::ALL.iter().map(|o| o.label()).collect(),
            WizardStep::Addons => {
                let mut options: Vec<&'static str> = AddonOption::ALL
                    .iter()
                    .filter(|addon| !self.addons.contains(addon))
                    .map(|addon| addon.label())
                    .collect();
                options.push(if self.addons.is_empty() { SKIP_ADDONS_OPTION } else { FINISH_OPTION });
                options
            }
            WizardStep::Complete => Vec::new(),
        }
    }

    pub fn select(&mut self, selection: &str) -> Result<SelectionOutcome, WizardError> {
        match self.step {
            WizardStep::Size => {
                self.size = Some(self.parse_or_reject(selection, SizeOption::parse)?);
                self.step = WizardStep::Style;
                Ok(SelectionOutcome::Advanced(self.step))
            }
            WizardStep::Style => {
                self.style = Some(self.parse_or_reject(selection, StyleOption::parse)?);
                self.step = WizardStep::Siding;
                Ok(SelectionOutcome::Advanced(self.step))
            }
            WizardStep::Siding => {
                self.siding = Some(self.parse_or_reject(selection, SidingOption::parse)?);
                self.step = WizardStep::Roof;
                Ok(SelectionOutcome::Advanced(self.step))
            }
            WizardStep::Roof => {
                self.roof = Some(self.parse_or_reject(selection, RoofOption::parse)?);
                self.step = WizardStep::Addons;
                Ok(SelectionOutcome::Advanced(self.step))
            }
            WizardStep::Addons => self.select_addon(selection),
            WizardStep::Complete => Err(WizardError::SessionComplete),
        }
    }

    fn select_addon(&mut self, selection: &str) -> Result<SelectionOutcome, WizardError> {
        if selection == FINISH_OPTION || selection == SKIP_ADDONS_OPTION {
            return Ok(self.complete());
        }

        let addon = self.parse_or_reject(selection, AddonOption::parse)?;
        if self.addons.contains(&addon) {
            // Duplicate guard: re-submitting a chosen add-on ends the loop.
            return Ok(self.complete());
        }

        self.addons.push(addon);
        Ok(SelectionOutcome::Advanced(WizardStep::Addons))
    }

    fn parse_or_reject<T>(
        &self,
        selection: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<T, WizardError> {
        parse(selection).ok_or_else(|| WizardError::UnknownOption {
            step: self.step,
            selection: selection.to_string(),
        })
    }

    fn complete(&mut self) -> SelectionOutcome {
        self.step = WizardStep::Complete;
        SelectionOutcome::Completed(self.configuration())
    }

    fn configuration(&self) -> ShedConfiguration {
        ShedConfiguration {
            size: self.size.map(|o| o.label().to_string()).unwrap_or_default(),
            style: self.style.map(|o| o.label().to_string()).unwrap_or_default(),
            siding: self.siding.map(|o| o.label().to_string()).unwrap_or_default(),
            roof: self.roof.map(|o| o.label().to_string()).unwrap_or_default(),
            addons: self.addons.iter().map(|a| a.label().to_string()).collect(),
        }
    }
}
