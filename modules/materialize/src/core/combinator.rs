//! Sequence combinators.
//!
//! Each combinator is an [`ImmaterialState`](crate::core::iterator::ImmaterialState) installed in a
//! [`StatefulIteratorMaterializer`](crate::core::iterator::StatefulIteratorMaterializer). Pass-through
//! combinators forward to their upstream, buffering ones are driven by [`TransformState`], and
//! single-result ones by [`AggregateState`].

/// Aggregation logic trait.
mod aggregate_logic;
/// Aggregation driver.
mod aggregate_state;
/// Universal quantifier.
mod all_logic;
/// Sequential concatenation.
mod concat_state;
/// Element count.
mod count_logic;
/// Matching element count.
mod count_where_logic;
/// Multiset subtraction.
mod diff_logic;
/// Key-based de-duplication.
mod distinct_by_logic;
/// Trailing window drop.
mod drop_right_logic;
/// Trailing predicate drop.
mod drop_right_while_logic;
/// Leading count drop.
mod drop_state;
/// Leading predicate drop.
mod drop_while_state;
/// Suffix test.
mod ends_with_logic;
/// Existential quantifier.
mod exists_logic;
/// Indexed filter.
mod filter_logic;
/// First match.
mod find_first_logic;
/// First match index.
mod find_index_logic;
/// First needle occurrence.
mod find_index_of_slice_logic;
/// Last match index.
mod find_last_index_logic;
/// Last needle occurrence.
mod find_last_index_of_slice_logic;
/// Last match.
mod find_last_logic;
/// Nested expansion.
mod flat_map_state;
/// Left fold.
mod fold_left_logic;
/// Right fold.
mod fold_right_logic;
/// Unordered containment.
mod includes_all_logic;
/// Contiguous containment.
mod includes_slice_logic;
/// Pull continuation flag.
mod logic_flow;
/// Indexed mapping.
mod map_state;
/// Extremum search.
mod max_logic;
/// Fallback on empty upstream.
mod or_else_state;
/// Left reduction.
mod reduce_left_logic;
/// Reversal.
mod reverse_logic;
/// Second input of two-source combinators.
mod secondary_source;
/// Streaming needle search.
mod slice_matcher;
/// Positional insertion.
mod splice_state;
/// Prefix test.
mod starts_with_logic;
/// Trailing window take.
mod take_right_logic;
/// Leading count take.
mod take_state;
/// Leading predicate take.
mod take_while_logic;
/// Transform logic trait.
mod transform_logic;
/// Transform driver.
mod transform_state;

pub use aggregate_logic::AggregateLogic;
pub use aggregate_state::AggregateState;
pub use all_logic::AllLogic;
pub use concat_state::ConcatState;
pub use count_logic::CountLogic;
pub use count_where_logic::CountWhereLogic;
pub use diff_logic::DiffLogic;
pub use distinct_by_logic::DistinctByLogic;
pub use drop_right_logic::DropRightLogic;
pub use drop_right_while_logic::DropRightWhileLogic;
pub use drop_state::DropState;
pub use drop_while_state::DropWhileState;
pub use ends_with_logic::EndsWithLogic;
pub use exists_logic::ExistsLogic;
pub use filter_logic::FilterLogic;
pub use find_first_logic::FindFirstLogic;
pub use find_index_logic::FindIndexLogic;
pub use find_index_of_slice_logic::FindIndexOfSliceLogic;
pub use find_last_index_logic::FindLastIndexLogic;
pub use find_last_index_of_slice_logic::FindLastIndexOfSliceLogic;
pub use find_last_logic::FindLastLogic;
pub use flat_map_state::FlatMapState;
pub use fold_left_logic::FoldLeftLogic;
pub use fold_right_logic::FoldRightLogic;
pub use includes_all_logic::IncludesAllLogic;
pub use includes_slice_logic::IncludesSliceLogic;
pub use logic_flow::LogicFlow;
pub use map_state::MapState;
pub use max_logic::MaxLogic;
pub use or_else_state::OrElseState;
pub use reduce_left_logic::ReduceLeftLogic;
pub use reverse_logic::ReverseLogic;
pub use secondary_source::SecondarySource;
pub use splice_state::SpliceState;
pub use starts_with_logic::StartsWithLogic;
pub use take_right_logic::TakeRightLogic;
pub use take_state::TakeState;
pub use take_while_logic::TakeWhileLogic;
pub use transform_logic::TransformLogic;
pub use transform_state::TransformState;
