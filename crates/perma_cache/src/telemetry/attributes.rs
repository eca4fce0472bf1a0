// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#[cfg(any(feature = "metrics", test))]
pub(crate) const METHOD_NAME: &str = "perma_cache.method";

#[cfg(test)]
pub(crate) const KEY_NAME: &str = "perma_cache.key";

#[cfg(test)]
pub(crate) const EVENT_NAME: &str = "perma_cache.event";

#[cfg(any(feature = "metrics", test))]
pub(crate) const OPERATION_NAME: &str = "perma_cache.operation";

#[cfg(any(feature = "metrics", test))]
pub(crate) const ACTIVITY_NAME: &str = "perma_cache.activity";

#[cfg(test)]
pub(crate) const DURATION_NAME: &str = "perma_cache.duration_ns";
