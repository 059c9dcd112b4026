//! Statistical analysis utilities for the epiwatch project.
//!
//! This crate provides the numeric building blocks of the analysis:
//!
//! - **Descriptive statistics**: count, mean, standard deviation, quartiles
//! - **Percentiles**: linear-interpolation percentiles of a sample
//! - **Histogram generation**: equal-width frequency distributions
//! - **Density estimation**: Gaussian kernel density with Scott's bandwidth
//! - **Correlation**: pairwise-complete Pearson correlation
//! - **Hypothesis testing**: Welch's two-sample t-test
//! - **Exceedance probability**: empirical tail probability above a percentile
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`percentiles`]: Percentile computation
//! - [`histogram`]: Histogram construction for visualizing data distributions
//! - [`density`]: Kernel density estimation
//! - [`correlation`]: Linear association between paired series
//! - [`distribution`]: Special functions and the Student's t distribution
//! - [`hypothesis`]: Two-sample tests for a difference of means
//! - [`exceedance`]: Tail probabilities
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use epiwatch_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! ```
//!
//! ## Testing for a difference of means
//!
//! ```
//! use epiwatch_stats::hypothesis::WelchTTest;
//!
//! let subject = [120.0, 135.0, 128.0, 140.0, 131.0];
//! let comparison = [80.0, 85.0, 79.0, 90.0];
//! let test = WelchTTest::new(&subject, &comparison).unwrap();
//! assert!(test.rejects_null(0.05));
//! ```
//!
//! ## Computing an exceedance probability
//!
//! ```
//! use epiwatch_stats::exceedance::ExceedanceProbability;
//!
//! let occupancy = [10.0, 12.0, 15.0, 11.0, 30.0, 14.0, 13.0, 12.0];
//! let tail = ExceedanceProbability::new(occupancy, 75.0).unwrap();
//! assert!(tail.probability <= 0.5);
//! ```

pub mod correlation;
pub mod density;
pub mod descriptive;
pub mod distribution;
pub mod exceedance;
pub mod histogram;
pub mod hypothesis;
pub mod percentiles;
