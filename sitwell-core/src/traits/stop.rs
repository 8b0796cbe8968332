//! External stop signal

/// Operator-requested halt, polled once per tick before sampling
pub trait StopSignal {
    /// Check whether a stop has been requested
    fn stop_requested(&mut self) -> bool;
}

/// A monitor that is never stopped
impl StopSignal for () {
    fn stop_requested(&mut self) -> bool {
        false
    }
}

/// A board without a stop button
impl<T: StopSignal> StopSignal for Option<T> {
    fn stop_requested(&mut self) -> bool {
        self.as_mut().is_some_and(|s| s.stop_requested())
    }
}
