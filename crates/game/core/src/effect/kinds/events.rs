//! Effects that act on the request event in flight.

use crate::effect::{Adjustment, AppliedValue, EffectError, Executor, Stage};
use crate::state::{Bindings, Value};

impl Executor<'_> {
    pub(super) fn prevent(&mut self) -> Result<AppliedValue, EffectError> {
        let frame = self.frames.last_mut().ok_or(EffectError::NoEventInFlight)?;
        if frame.stage != Stage::Before {
            return Err(EffectError::TooLateToPrevent(frame.event.kind));
        }
        frame.prevented = true;
        Ok(AppliedValue::None)
    }

    /// Rewrites one payload field of the event in flight.
    ///
    /// Later triggers and the default rule see the adjusted value.
    pub(super) fn adjust_event(
        &mut self,
        key: &str,
        adjustment: &Adjustment,
        bindings: &Bindings,
    ) -> Result<AppliedValue, EffectError> {
        let value = match adjustment {
            Adjustment::Set(param) => param.resolve(bindings)?,
            Adjustment::Add(delta) => {
                let frame = self.frames.last().ok_or(EffectError::NoEventInFlight)?;
                let current = match frame.event.payload.get(key) {
                    None => 0,
                    Some(Value::Int(n)) => *n,
                    Some(_) => return Err(EffectError::NotAnInteger { key: key.into() }),
                };
                Value::Int(current.saturating_add(*delta))
            }
        };

        let frame = self.frames.last_mut().ok_or(EffectError::NoEventInFlight)?;
        frame.event.payload.insert(key, value);
        Ok(AppliedValue::EventAdjusted { key: key.into() })
    }
}
