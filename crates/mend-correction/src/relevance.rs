//! Relevance of every proposal the correctors emit.
//!
//! Higher sorts first. Proposals with equal relevance keep their emission order.

// Javadoc
pub const ADD_JAVADOC_TAG: i32 = 8;
pub const ADD_ALL_MISSING_TAGS: i32 = 5;
pub const REMOVE_JAVADOC_TAG: i32 = 8;
pub const ADD_JAVADOC_COMMENT: i32 = 8;
pub const QUALIFY_INNER_TYPE: i32 = 8;

// Unused declarations
pub const REMOVE_UNUSED: i32 = 10;
pub const REMOVE_UNUSED_KEEP_SIDE_EFFECTS: i32 = 9;
pub const GETTER_SETTER: i32 = 7;

// Exceptions
pub const ADD_THROWS: i32 = 8;
pub const ADD_CATCH_TO_SURROUNDING_TRY: i32 = 7;
pub const ADD_TO_EXISTING_CATCH: i32 = 6;
pub const ADD_ADDITIONAL_MULTI_CATCH: i32 = 6;
pub const SURROUND_WITH_TRY_WITH_RESOURCES: i32 = 6;
pub const SURROUND_WITH_TRY_CATCH: i32 = 5;
pub const SURROUND_WITH_TRY_MULTI_CATCH: i32 = 4;
pub const REMOVE_CATCH: i32 = 8;
pub const REPLACE_CATCH_WITH_THROWS: i32 = 7;

// Static access
pub const CHANGE_TO_STATIC_ACCESS: i32 = 9;
pub const REMOVE_STATIC_MODIFIER: i32 = 5;

// Type mismatch
pub const ADD_CAST: i32 = 8;
pub const CHANGE_CAST: i32 = 8;
pub const ADD_PARENTHESES_AROUND_CAST: i32 = 7;
pub const CHANGE_VARIABLE_TYPE: i32 = 7;
pub const CREATE_LOOP_VARIABLE: i32 = 7;
pub const CHANGE_RETURN_TYPE: i32 = 6;
pub const REMOVE_EXCEPTIONS: i32 = 8;
pub const ADD_EXCEPTIONS: i32 = 7;
pub const CHANGE_OVERRIDDEN_RETURN_TYPE: i32 = 5;
pub const LET_IMPLEMENT: i32 = 4;

// Unresolved methods
pub const CHANGE_TO_SIMILAR_METHOD: i32 = 9;
pub const QUALIFY_WITH_ENCLOSING_TYPE: i32 = 8;
pub const STATIC_IMPORT: i32 = 9;
pub const CHANGE_ARGUMENTS: i32 = 8;
pub const SWAP_ARGUMENTS: i32 = 8;
pub const CAST_ARGUMENT: i32 = 7;
pub const CHANGE_METHOD_SIGNATURE: i32 = 7;
pub const CHANGE_ARGUMENT_SOURCE_TYPE: i32 = 6;
pub const CREATE_METHOD: i32 = 5;
pub const CREATE_CONSTRUCTOR: i32 = 5;
pub const CAST_RECEIVER: i32 = 4;

// Unresolved types
pub const IMPORT_TYPE: i32 = 9;
pub const CHANGE_TO_SIMILAR_TYPE: i32 = 8;
pub const CREATE_CLASS: i32 = 5;
pub const CREATE_INTERFACE: i32 = 5;
pub const CREATE_ENUM: i32 = 4;
pub const CREATE_ANNOTATION: i32 = 4;
pub const ADD_TYPE_PARAMETER: i32 = 3;

// Unresolved variables
pub const CHANGE_TO_SIMILAR_VARIABLE: i32 = 8;
pub const CREATE_LOCAL: i32 = 7;
pub const CREATE_FIELD: i32 = 6;
pub const CREATE_PARAMETER: i32 = 5;
pub const CREATE_CONSTANT: i32 = 4;
pub const REMOVE_ASSIGNMENT: i32 = 3;

// Return types
pub const ADD_RETURN_STATEMENT: i32 = 7;
pub const CHANGE_RETURN_STATEMENT: i32 = 7;
pub const CHANGE_METHOD_RETURN_TYPE: i32 = 6;
pub const CHANGE_TO_VOID: i32 = 5;
pub const CHANGE_TO_PLAIN_RETURN: i32 = 5;
pub const CHANGE_TO_CONSTRUCTOR: i32 = 5;
