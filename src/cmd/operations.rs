//! The Outline operation table. Pure data: one entry per `(group, command)`.

use super::catalog::{GroupInfo, Method, OperationDescriptor, ParamKind, ParamSpec, Paging};

macro_rules! req {
    ($flag:literal, $name:literal, $kind:ident, $help:literal) => {
        ParamSpec {
            flag: $flag,
            name: $name,
            kind: ParamKind::$kind,
            required: true,
            help: $help,
        }
    };
}

macro_rules! opt {
    ($flag:literal, $name:literal, $kind:ident, $help:literal) => {
        ParamSpec {
            flag: $flag,
            name: $name,
            kind: ParamKind::$kind,
            required: false,
            help: $help,
        }
    };
}

macro_rules! op {
    (@paging) => { Paging::None };
    (@paging $paging:expr) => { $paging };
    ($method:ident $group:literal $name:literal => $path:literal, $summary:literal,
     [$($param:expr),* $(,)?] $(, $paging:expr)?) => {
        OperationDescriptor {
            group: $group,
            name: $name,
            method: Method::$method,
            path: $path,
            summary: $summary,
            params: &[$($param),*],
            paging: op!(@paging $($paging)?),
        }
    };
}

pub static GROUPS: &[GroupInfo] = &[
    GroupInfo { name: "attachments", about: "Manage attachments" },
    GroupInfo { name: "auth", about: "Authentication operations" },
    GroupInfo { name: "collections", about: "Manage collections" },
    GroupInfo { name: "comments", about: "Manage comments" },
    GroupInfo { name: "data-attributes", about: "Manage data attributes" },
    GroupInfo { name: "documents", about: "Manage documents" },
    GroupInfo { name: "events", about: "View events" },
    GroupInfo { name: "file-operations", about: "File operation management" },
    GroupInfo { name: "groups", about: "Manage groups" },
    GroupInfo { name: "oauth-clients", about: "Manage OAuth clients" },
    GroupInfo { name: "oauth-authentications", about: "Manage OAuth authentications" },
    GroupInfo { name: "revisions", about: "View document revisions" },
    GroupInfo { name: "shares", about: "Manage shares" },
    GroupInfo { name: "stars", about: "Manage stars" },
    GroupInfo { name: "users", about: "Manage users" },
    GroupInfo { name: "views", about: "View document views" },
];

pub static OPERATIONS: &[OperationDescriptor] = &[
    // attachments
    op!(Mutate "attachments" "create" => "/attachments.create", "Create an attachment", [
        req!("name", "name", String, "File name"),
        req!("content-type", "contentType", String, "MIME type (e.g. image/png)"),
        req!("size", "size", Integer, "File size in bytes"),
        opt!("document-id", "documentId", Id, "Associated document ID"),
    ]),
    op!(Read "attachments" "redirect" => "/attachments.redirect", "Retrieve an attachment URL", [
        req!("id", "id", Id, "Attachment ID"),
    ]),
    op!(Mutate "attachments" "delete" => "/attachments.delete", "Delete an attachment", [
        req!("id", "id", Id, "Attachment ID"),
    ]),
    // auth
    op!(Read "auth" "info" => "/auth.info", "Retrieve authentication details", []),
    op!(Read "auth" "config" => "/auth.config", "Retrieve authentication configuration", []),
    // collections
    op!(Read "collections" "info" => "/collections.info", "Retrieve a collection", [
        req!("id", "id", Id, "Collection ID"),
    ]),
    op!(Read "collections" "list" => "/collections.list", "List all collections", [], Paging::Offset),
    op!(Mutate "collections" "create" => "/collections.create", "Create a collection", [
        req!("name", "name", String, "Collection name"),
        opt!("description", "description", String, "Collection description"),
        opt!("color", "color", String, "Color hex code"),
        opt!("icon", "icon", String, "Icon name"),
        opt!("permission", "permission", String, "Default permission (read_write or read)"),
        opt!("private", "private", Boolean, "Make collection private"),
    ]),
    op!(Mutate "collections" "update" => "/collections.update", "Update a collection", [
        req!("id", "id", Id, "Collection ID"),
        opt!("name", "name", String, "Collection name"),
        opt!("description", "description", String, "Collection description"),
        opt!("color", "color", String, "Color hex code"),
        opt!("icon", "icon", String, "Icon name"),
        opt!("permission", "permission", String, "Default permission"),
        opt!("sharing", "sharing", Boolean, "Enable sharing"),
    ]),
    op!(Mutate "collections" "delete" => "/collections.delete", "Delete a collection", [
        req!("id", "id", Id, "Collection ID"),
    ]),
    op!(Mutate "collections" "add-group" => "/collections.add_group", "Add a group to a collection", [
        req!("id", "id", Id, "Collection ID"),
        req!("group-id", "groupId", Id, "Group ID"),
        opt!("permission", "permission", String, "Permission level (read_write or read)"),
    ]),
    op!(Mutate "collections" "remove-group" => "/collections.remove_group", "Remove a group from a collection", [
        req!("id", "id", Id, "Collection ID"),
        req!("group-id", "groupId", Id, "Group ID"),
    ]),
    op!(Mutate "collections" "add-user" => "/collections.add_user", "Add a user to a collection", [
        req!("id", "id", Id, "Collection ID"),
        req!("user-id", "userId", Id, "User ID"),
        opt!("permission", "permission", String, "Permission level"),
    ]),
    op!(Mutate "collections" "remove-user" => "/collections.remove_user", "Remove a user from a collection", [
        req!("id", "id", Id, "Collection ID"),
        req!("user-id", "userId", Id, "User ID"),
    ]),
    op!(Read "collections" "memberships" => "/collections.memberships", "List collection memberships", [
        req!("id", "id", Id, "Collection ID"),
        opt!("query", "query", String, "Search query"),
    ], Paging::Nested("users")),
    op!(Read "collections" "group-memberships" => "/collections.group_memberships", "List collection group memberships", [
        req!("id", "id", Id, "Collection ID"),
        opt!("query", "query", String, "Search query"),
        opt!("permission", "permission", String, "Filter by permission"),
    ], Paging::Nested("groups")),
    op!(Read "collections" "documents" => "/collections.documents", "List the document tree of a collection", [
        req!("id", "id", Id, "Collection ID"),
    ], Paging::Offset),
    op!(Mutate "collections" "export" => "/collections.export", "Export a collection", [
        req!("id", "id", Id, "Collection ID"),
        opt!("format-type", "format", String, "Export format"),
    ]),
    op!(Mutate "collections" "export-all" => "/collections.export_all", "Export all collections", [
        opt!("format-type", "format", String, "Export format"),
    ]),
    // comments
    op!(Mutate "comments" "create" => "/comments.create", "Create a comment", [
        req!("document-id", "documentId", Id, "Document ID"),
        req!("data", "data", Json, "Comment data (JSON)"),
        opt!("parent-comment-id", "parentCommentId", Id, "Parent comment ID for replies"),
    ]),
    op!(Read "comments" "info" => "/comments.info", "Retrieve a comment", [
        req!("id", "id", Id, "Comment ID"),
    ]),
    op!(Read "comments" "list" => "/comments.list", "List comments", [
        opt!("document-id", "documentId", Id, "Filter by document ID"),
        opt!("collection-id", "collectionId", Id, "Filter by collection ID"),
    ], Paging::Offset),
    op!(Mutate "comments" "update" => "/comments.update", "Update a comment", [
        req!("id", "id", Id, "Comment ID"),
        req!("data", "data", Json, "Comment data (JSON)"),
    ]),
    op!(Mutate "comments" "delete" => "/comments.delete", "Delete a comment", [
        req!("id", "id", Id, "Comment ID"),
    ]),
    // data attributes
    op!(Mutate "data-attributes" "create" => "/dataAttributes.create", "Create a data attribute", [
        req!("document-id", "documentId", Id, "Document ID"),
        req!("key", "key", String, "Attribute key"),
        req!("value", "value", String, "Attribute value"),
    ]),
    op!(Read "data-attributes" "info" => "/dataAttributes.info", "Retrieve a data attribute", [
        req!("id", "id", Id, "Data attribute ID"),
    ]),
    op!(Read "data-attributes" "list" => "/dataAttributes.list", "List data attributes", [
        opt!("document-id", "documentId", Id, "Filter by document ID"),
    ], Paging::Offset),
    op!(Mutate "data-attributes" "update" => "/dataAttributes.update", "Update a data attribute", [
        req!("id", "id", Id, "Data attribute ID"),
        req!("value", "value", String, "New value"),
    ]),
    op!(Mutate "data-attributes" "delete" => "/dataAttributes.delete", "Delete a data attribute", [
        req!("id", "id", Id, "Data attribute ID"),
    ]),
    // documents
    op!(Read "documents" "info" => "/documents.info", "Retrieve a document", [
        req!("id", "id", Id, "Document ID"),
        opt!("share-id", "shareId", Id, "Share ID for public access"),
    ]),
    op!(Read "documents" "list" => "/documents.list", "List all documents", [
        opt!("collection-id", "collectionId", Id, "Filter by collection"),
        opt!("parent-document-id", "parentDocumentId", Id, "Filter by parent document"),
        opt!("backlink-document-id", "backlinkDocumentId", Id, "Filter by backlink document"),
        opt!("template", "template", Boolean, "Filter templates only"),
    ], Paging::Offset),
    op!(Mutate "documents" "create" => "/documents.create", "Create a document", [
        req!("title", "title", String, "Document title"),
        opt!("text", "text", String, "Document content (markdown)"),
        req!("collection-id", "collectionId", Id, "Collection ID"),
        opt!("parent-document-id", "parentDocumentId", Id, "Parent document ID"),
        opt!("template", "template", Boolean, "Create as template"),
        opt!("template-id", "templateId", Id, "Template to use"),
        opt!("publish", "publish", Boolean, "Publish immediately"),
    ]),
    op!(Mutate "documents" "update" => "/documents.update", "Update a document", [
        req!("id", "id", Id, "Document ID"),
        opt!("title", "title", String, "Document title"),
        opt!("text", "text", String, "Document content"),
        opt!("append", "append", Boolean, "Append to existing content"),
        opt!("publish", "publish", Boolean, "Publish document"),
        opt!("done", "done", Boolean, "Mark as done"),
    ]),
    op!(Mutate "documents" "delete" => "/documents.delete", "Delete a document", [
        req!("id", "id", Id, "Document ID"),
        opt!("permanent", "permanent", Boolean, "Permanently delete (skip trash)"),
    ]),
    op!(Read "documents" "search" => "/documents.search", "Search documents", [
        req!("query", "query", String, "Search query"),
        opt!("collection-id", "collectionId", Id, "Limit to collection"),
        opt!("user-id", "userId", Id, "Filter by user"),
        opt!("include-archived", "includeArchived", Boolean, "Include archived documents"),
        opt!("date-filter", "dateFilter", String, "Date filter (day, week, month, year)"),
    ], Paging::Offset),
    op!(Read "documents" "search-titles" => "/documents.search_titles", "Search document titles", [
        req!("query", "query", String, "Search query"),
        opt!("collection-id", "collectionId", Id, "Limit to collection"),
    ], Paging::Offset),
    op!(Mutate "documents" "archive" => "/documents.archive", "Archive a document", [
        req!("id", "id", Id, "Document ID"),
    ]),
    op!(Read "documents" "archived" => "/documents.archived", "List archived documents", [], Paging::Offset),
    op!(Read "documents" "deleted" => "/documents.deleted", "List deleted documents", [], Paging::Offset),
    op!(Read "documents" "drafts" => "/documents.drafts", "List draft documents", [
        opt!("collection-id", "collectionId", Id, "Filter by collection"),
    ], Paging::Offset),
    op!(Read "documents" "viewed" => "/documents.viewed", "List recently viewed documents", [], Paging::Offset),
    op!(Mutate "documents" "move" => "/documents.move", "Move a document", [
        req!("id", "id", Id, "Document ID"),
        opt!("collection-id", "collectionId", Id, "Target collection ID"),
        opt!("parent-document-id", "parentDocumentId", Id, "Target parent document ID"),
        opt!("index", "index", Integer, "Position index"),
    ]),
    op!(Mutate "documents" "duplicate" => "/documents.duplicate", "Duplicate a document", [
        req!("id", "id", Id, "Document ID"),
        opt!("title", "title", String, "Title for the duplicate"),
        opt!("collection-id", "collectionId", Id, "Target collection ID"),
        opt!("parent-document-id", "parentDocumentId", Id, "Parent document ID"),
        opt!("recursive", "recursive", Boolean, "Duplicate child documents"),
        opt!("publish", "publish", Boolean, "Publish the duplicate"),
    ]),
    op!(Mutate "documents" "restore" => "/documents.restore", "Restore a document from trash", [
        req!("id", "id", Id, "Document ID"),
        opt!("revision-id", "revisionId", Id, "Revision ID to restore to"),
        opt!("collection-id", "collectionId", Id, "Collection to restore to"),
    ]),
    op!(Mutate "documents" "unpublish" => "/documents.unpublish", "Unpublish a document", [
        req!("id", "id", Id, "Document ID"),
    ]),
    op!(Mutate "documents" "import" => "/documents.import", "Import a document", [
        opt!("data", "data", String, "Document data"),
        opt!("file", "data", File, "File to import (overrides --data)"),
        req!("collection-id", "collectionId", Id, "Collection ID"),
        opt!("parent-document-id", "parentDocumentId", Id, "Parent document ID"),
        opt!("publish", "publish", Boolean, "Publish after import"),
    ]),
    op!(Read "documents" "export" => "/documents.export", "Export a document", [
        req!("id", "id", Id, "Document ID"),
    ]),
    op!(Mutate "documents" "templatize" => "/documents.templatize", "Convert a document to a template", [
        req!("id", "id", Id, "Document ID"),
    ]),
    op!(Mutate "documents" "add-user" => "/documents.add_user", "Add a user to a document", [
        req!("id", "id", Id, "Document ID"),
        req!("user-id", "userId", Id, "User ID"),
        opt!("permission", "permission", String, "Permission level"),
    ]),
    op!(Mutate "documents" "remove-user" => "/documents.remove_user", "Remove a user from a document", [
        req!("id", "id", Id, "Document ID"),
        req!("user-id", "userId", Id, "User ID"),
    ]),
    op!(Mutate "documents" "add-group" => "/documents.add_group", "Add a group to a document", [
        req!("id", "id", Id, "Document ID"),
        req!("group-id", "groupId", Id, "Group ID"),
        opt!("permission", "permission", String, "Permission level"),
    ]),
    op!(Mutate "documents" "remove-group" => "/documents.remove_group", "Remove a group from a document", [
        req!("id", "id", Id, "Document ID"),
        req!("group-id", "groupId", Id, "Group ID"),
    ]),
    op!(Read "documents" "memberships" => "/documents.memberships", "List document memberships", [
        req!("id", "id", Id, "Document ID"),
        opt!("query", "query", String, "Search query"),
    ], Paging::Nested("users")),
    op!(Read "documents" "group-memberships" => "/documents.group_memberships", "List document group memberships", [
        req!("id", "id", Id, "Document ID"),
        opt!("query", "query", String, "Search query"),
    ], Paging::Nested("groups")),
    op!(Read "documents" "users" => "/documents.users", "List users with access to a document", [
        req!("id", "id", Id, "Document ID"),
    ], Paging::Offset),
    op!(Read "documents" "documents" => "/documents.documents", "List child documents", [
        req!("id", "id", Id, "Parent document ID"),
    ], Paging::Offset),
    op!(Mutate "documents" "empty-trash" => "/documents.empty_trash", "Empty the trash", []),
    op!(Read "documents" "answer-question" => "/documents.answerQuestion", "Answer a question about a document", [
        req!("document-id", "documentId", Id, "Document ID"),
        req!("question", "question", String, "Question to answer"),
    ]),
    // events
    op!(Read "events" "list" => "/events.list", "List events", [
        opt!("name", "name", String, "Filter by event name"),
        opt!("actor-id", "actorId", Id, "Filter by actor ID"),
        opt!("document-id", "documentId", Id, "Filter by document ID"),
        opt!("collection-id", "collectionId", Id, "Filter by collection ID"),
        opt!("audit-log", "auditLog", Boolean, "Include audit log events"),
    ], Paging::Offset),
    // file operations
    op!(Read "file-operations" "info" => "/fileOperations.info", "Retrieve a file operation", [
        req!("id", "id", Id, "File operation ID"),
    ]),
    op!(Read "file-operations" "list" => "/fileOperations.list", "List file operations", [
        opt!("type", "type", String, "Filter by operation type"),
    ], Paging::Offset),
    op!(Read "file-operations" "redirect" => "/fileOperations.redirect", "Get the download URL of a file operation", [
        req!("id", "id", Id, "File operation ID"),
    ]),
    op!(Mutate "file-operations" "delete" => "/fileOperations.delete", "Delete a file operation", [
        req!("id", "id", Id, "File operation ID"),
    ]),
    // groups
    op!(Read "groups" "info" => "/groups.info", "Retrieve a group", [
        req!("id", "id", Id, "Group ID"),
    ]),
    op!(Read "groups" "list" => "/groups.list", "List all groups", [], Paging::Nested("groups")),
    op!(Mutate "groups" "create" => "/groups.create", "Create a group", [
        req!("name", "name", String, "Group name"),
    ]),
    op!(Mutate "groups" "update" => "/groups.update", "Update a group", [
        req!("id", "id", Id, "Group ID"),
        req!("name", "name", String, "New group name"),
    ]),
    op!(Mutate "groups" "delete" => "/groups.delete", "Delete a group", [
        req!("id", "id", Id, "Group ID"),
    ]),
    op!(Mutate "groups" "add-user" => "/groups.add_user", "Add a user to a group", [
        req!("id", "id", Id, "Group ID"),
        req!("user-id", "userId", Id, "User ID"),
    ]),
    op!(Mutate "groups" "remove-user" => "/groups.remove_user", "Remove a user from a group", [
        req!("id", "id", Id, "Group ID"),
        req!("user-id", "userId", Id, "User ID"),
    ]),
    op!(Read "groups" "memberships" => "/groups.memberships", "List group memberships", [
        req!("id", "id", Id, "Group ID"),
        opt!("query", "query", String, "Search query"),
    ], Paging::Nested("users")),
    // oauth clients
    op!(Read "oauth-clients" "info" => "/oauthClients.info", "Retrieve an OAuth client", [
        req!("id", "id", Id, "OAuth client ID"),
    ]),
    op!(Read "oauth-clients" "list" => "/oauthClients.list", "List OAuth clients", [], Paging::Offset),
    op!(Mutate "oauth-clients" "create" => "/oauthClients.create", "Create an OAuth client", [
        req!("name", "name", String, "Client name"),
        req!("redirect-uris", "redirectUris", List, "Redirect URIs (comma-separated)"),
    ]),
    op!(Mutate "oauth-clients" "update" => "/oauthClients.update", "Update an OAuth client", [
        req!("id", "id", Id, "OAuth client ID"),
        opt!("name", "name", String, "Client name"),
        opt!("redirect-uris", "redirectUris", List, "Redirect URIs (comma-separated)"),
    ]),
    op!(Mutate "oauth-clients" "delete" => "/oauthClients.delete", "Delete an OAuth client", [
        req!("id", "id", Id, "OAuth client ID"),
    ]),
    op!(Mutate "oauth-clients" "rotate-secret" => "/oauthClients.rotate_secret", "Rotate an OAuth client secret", [
        req!("id", "id", Id, "OAuth client ID"),
    ]),
    // oauth authentications
    op!(Read "oauth-authentications" "list" => "/oauthAuthentications.list", "List OAuth authentications", [], Paging::Offset),
    op!(Mutate "oauth-authentications" "delete" => "/oauthAuthentications.delete", "Delete an OAuth authentication", [
        req!("id", "id", Id, "OAuth authentication ID"),
    ]),
    // revisions
    op!(Read "revisions" "info" => "/revisions.info", "Retrieve a revision", [
        req!("id", "id", Id, "Revision ID"),
    ]),
    op!(Read "revisions" "list" => "/revisions.list", "List document revisions", [
        req!("document-id", "documentId", Id, "Document ID"),
    ], Paging::Offset),
    // shares
    op!(Read "shares" "info" => "/shares.info", "Retrieve a share", [
        req!("id", "id", Id, "Share ID"),
    ]),
    op!(Read "shares" "list" => "/shares.list", "List shares", [], Paging::Offset),
    op!(Mutate "shares" "create" => "/shares.create", "Create a share", [
        req!("document-id", "documentId", Id, "Document ID"),
        opt!("published", "published", Boolean, "Make share published"),
    ]),
    op!(Mutate "shares" "update" => "/shares.update", "Update a share", [
        req!("id", "id", Id, "Share ID"),
        opt!("published", "published", Boolean, "Published status"),
    ]),
    op!(Mutate "shares" "revoke" => "/shares.revoke", "Revoke a share", [
        req!("id", "id", Id, "Share ID"),
    ]),
    // stars
    op!(Read "stars" "list" => "/stars.list", "List starred documents", [], Paging::Nested("stars")),
    op!(Mutate "stars" "create" => "/stars.create", "Star a document", [
        req!("document-id", "documentId", Id, "Document ID"),
    ]),
    op!(Mutate "stars" "update" => "/stars.update", "Update star position", [
        req!("id", "id", Id, "Star ID"),
        req!("index", "index", Integer, "New index position"),
    ]),
    op!(Mutate "stars" "delete" => "/stars.delete", "Remove a star", [
        req!("id", "id", Id, "Star ID"),
    ]),
    // users
    op!(Read "users" "info" => "/users.info", "Retrieve a user (current user if no ID given)", [
        opt!("id", "id", Id, "User ID"),
    ]),
    op!(Read "users" "list" => "/users.list", "List users", [
        opt!("query", "query", String, "Search query"),
        opt!("filter", "filter", String, "Filter type (all, admins, members, suspended, invited)"),
    ], Paging::Offset),
    op!(Mutate "users" "invite" => "/users.invite", "Invite a user", [
        req!("email", "email", String, "User email"),
        req!("name", "name", String, "User name"),
        opt!("role", "role", String, "User role (admin, member, viewer)"),
    ]),
    op!(Mutate "users" "update" => "/users.update", "Update a user", [
        req!("id", "id", Id, "User ID"),
        opt!("name", "name", String, "User name"),
        opt!("avatar-url", "avatarUrl", String, "Avatar URL"),
        opt!("language", "language", String, "Language code"),
    ]),
    op!(Mutate "users" "update-role" => "/users.update_role", "Update user role", [
        req!("id", "id", Id, "User ID"),
        req!("role", "role", String, "New role (admin, member, viewer)"),
    ]),
    op!(Mutate "users" "activate" => "/users.activate", "Activate a suspended user", [
        req!("id", "id", Id, "User ID"),
    ]),
    op!(Mutate "users" "suspend" => "/users.suspend", "Suspend a user", [
        req!("id", "id", Id, "User ID"),
    ]),
    op!(Mutate "users" "delete" => "/users.delete", "Delete a user", [
        req!("id", "id", Id, "User ID"),
    ]),
    // views
    op!(Read "views" "list" => "/views.list", "List document views", [
        req!("document-id", "documentId", Id, "Document ID"),
    ], Paging::Offset),
    op!(Mutate "views" "create" => "/views.create", "Record a document view", [
        req!("document-id", "documentId", Id, "Document ID"),
    ]),
];
