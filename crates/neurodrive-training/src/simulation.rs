/// The environment a population of networks is trained in.
///
/// Individuals are addressed by their index in the population. The trainer drives one tick
/// as: read [`Simulation::sensors`] and [`Simulation::actuate`] for every active individual,
/// then a single [`Simulation::step`].
pub trait Simulation {
    /// Number of sensor readings per individual; the network input size.
    fn sensor_count(&self) -> usize;

    /// Number of actuator values per individual; the network output size.
    fn output_count(&self) -> usize;

    /// Checkpoints an individual must pass to complete the course.
    fn checkpoint_count(&self) -> usize;

    /// Puts `population` individuals at the start.
    fn reset(&mut self, population: usize);

    fn sensors(&self, index: usize) -> Vec<f64>;

    fn actuate(&mut self, index: usize, outputs: &[f64]);

    /// Advances every running individual by `dt` seconds.
    fn step(&mut self, dt: f64);

    /// Raw fitness: checkpoints passed so far.
    fn progress(&self, index: usize) -> f64;

    /// `false` once the individual crashed or finished.
    fn is_running(&self, index: usize) -> bool;
}
