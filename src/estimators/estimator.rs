/// Online scalar estimator fed one value at a time.
///
/// Implementations accept values incrementally via [`add`](Estimator::add)
/// and expose the current estimate via [`estimation`](Estimator::estimation),
/// which is `NaN` until something has been added.
pub trait Estimator {
    /// Incorporates a new observation. Non-finite values are ignored.
    fn add(&mut self, v: f64);

    /// Returns the current estimate.
    fn estimation(&self) -> f64;

    fn add_all<I: IntoIterator<Item = f64>>(&mut self, values: I)
    where
        Self: Sized,
    {
        for v in values {
            self.add(v);
        }
    }
}
