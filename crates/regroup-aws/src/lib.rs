//! regroup-aws — the AWS Auto Scaling control plane.
//!
//! Implements [`regroup_core::ControlPlane`] on top of
//! `aws-sdk-autoscaling`. Group describes map to `DescribeAutoScalingGroups`,
//! instance pages to `DescribeAutoScalingInstances` (scoped client-side to
//! the requested group), and terminations to
//! `TerminateInstanceInAutoScalingGroup`.

pub mod client;

pub use client::AwsControlPlane;
